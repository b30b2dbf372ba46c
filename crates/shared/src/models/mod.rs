pub mod deployment;
pub mod job;
pub mod project;
pub mod tier;

pub use job::{Job, JobType};
pub use project::Project;
