pub mod activity_logs;
pub mod applications;
pub mod clubs;
pub mod dashboard;
pub mod members;
