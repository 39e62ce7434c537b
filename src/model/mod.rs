pub mod employee;
pub mod job_title;
pub mod mark;
pub mod project;
