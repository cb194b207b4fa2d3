//! Command execution utilities
//!
//! Finalize callbacks (dependency installation) and the source-generation
//! executor shell out to external tools through a single runner with
//! consistent error handling and logging.

use std::path::{Path, PathBuf};
use std::process::Command;

use colored::Colorize;

use crate::types::{RiggerError, RiggerResult};

/// Runs external commands from the workspace root
pub struct CommandRunner {
    workspace_root: PathBuf,
}

impl CommandRunner {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
        }
    }

    /// Execute a program with arguments, failing on a non-zero exit code
    pub fn run(&self, program: &str, args: &[String]) -> RiggerResult<()> {
        println!(
            "{} {} {}",
            ">".dimmed(),
            program.bold(),
            args.join(" ").dimmed()
        );

        let status = Command::new(program)
            .args(args)
            .current_dir(&self.workspace_root)
            .status()
            .map_err(|e| RiggerError::Command(format!("failed to execute '{program}': {e}")))?;

        if !status.success() {
            return Err(RiggerError::Command(format!(
                "'{program}' failed with exit code {}",
                status.code().unwrap_or(-1)
            )));
        }

        Ok(())
    }

    /// Execute a single shell command line
    pub fn run_shell(&self, command_line: &str) -> RiggerResult<()> {
        self.run("sh", &["-c".to_string(), command_line.to_string()])
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }
}
