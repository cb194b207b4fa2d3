//! Task executors
//!
//! Executors run a project target. Unlike generators they do not mutate the
//! workspace tree; they shell out to external tools. Failures are converted to
//! an [`ExecutorResult`](generate_sources::ExecutorResult) at this boundary so
//! the invoking build tool reports a clean task failure instead of a stack
//! trace.

pub mod generate_sources;
