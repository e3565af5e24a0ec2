pub mod annotations;
pub mod dashboard;
pub mod upload;
