pub mod attendance;
pub mod employee;
pub mod job_title;
pub mod project;
pub mod report;
