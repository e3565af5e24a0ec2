pub mod records;
pub mod submission;
