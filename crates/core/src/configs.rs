//! Configuration documents for the workspace and its projects

pub mod project;
pub mod versions;
pub mod workspace;
