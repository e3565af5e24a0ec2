pub mod path;
pub mod render;
pub mod walk;
