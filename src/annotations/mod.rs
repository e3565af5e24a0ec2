pub mod dialog;
pub mod restriction;
pub mod store;
