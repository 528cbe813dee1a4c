pub mod completions;
pub mod config;
pub mod limits;
pub mod rescue;
pub mod session;
pub mod summary;
pub mod task;
