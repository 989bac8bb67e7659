//! Filesystem staging for commit-guard test repositories
//!
//! Provides the async file operations used to build throwaway repositories
//! (directory creation, fixture copies with optional rewriting, permission
//! changes, teardown) and the naming scheme for those repositories.

pub mod error;
pub mod naming;
pub mod staging;

pub use error::{Error, Result};
pub use naming::{random_repo_dir, validate_component};
pub use staging::Transform;
