//! Rigger Core Library
//!
//! This is the core library for the rigger workspace tooling. It provides the
//! building blocks for code generators and task executors: a staged workspace
//! tree, configuration documents, template rendering, and the generators and
//! executors built on top of them.
//!
//! ## Architecture
//!
//! The core library is organized into several modules:
//!
//! - [`tree`] - Staged, in-memory view of the workspace filesystem
//! - [`documents`] - JSON/YAML document helpers over the tree
//! - [`registry`] - Project registration and configuration read/update
//! - [`configs`] - Workspace, project and version configuration types
//! - [`templates`] - Template rendering and file scaffolding
//! - [`compose`] - docker-compose service composition for blackbox harnesses
//! - [`generators`] - Generator orchestrators (applications, harnesses, mocks)
//! - [`executors`] - Task executors that shell out to external tools
//! - [`execution`] - Command running with workspace-rooted working directories
//! - [`types`] - Common error types and type aliases
//!
//! ## Usage
//!
//! Generators operate on a [`Tree`], which stages mutations in memory until
//! they are flushed:
//!
//! ```rust,no_run
//! use rigger_core::generators::application::{application_generator, ApplicationGeneratorOptions};
//! use rigger_core::configs::versions::DependencyVersions;
//! use rigger_core::generators::run_callbacks;
//! use rigger_core::tree::Tree;
//!
//! # async fn example() -> rigger_core::types::RiggerResult<()> {
//! let mut tree = Tree::new(".");
//! let callbacks = application_generator(
//!     &mut tree,
//!     ApplicationGeneratorOptions {
//!         name: "my-service".to_string(),
//!         directory: None,
//!         tags: None,
//!         blackbox_project: None,
//!         openapi_client_library: false,
//!     },
//!     &DependencyVersions::default(),
//! )
//! .await?;
//! let root = tree.root().to_path_buf();
//! tree.flush_changes()?;
//! run_callbacks(callbacks, &root)?;
//! # Ok(())
//! # }
//! ```

pub mod compose;
pub mod configs;
pub mod documents;
pub mod execution;
pub mod executors;
pub mod generators;
pub mod names;
pub mod registry;
pub mod templates;
pub mod tree;
pub mod types;

// Re-export the main types for easier usage
pub use tree::Tree;
pub use types::{RiggerError, RiggerResult};
