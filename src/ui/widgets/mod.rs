pub mod dashboard;
pub mod volume;
