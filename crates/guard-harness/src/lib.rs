//! Scenario harness for commit-time content scanners
//!
//! Builds throwaway repositories for a configured backend, installs the
//! scanner hook, drops fixture files in and commits them, so tests can
//! check that the hook accepts clean files and rejects forbidden ones.
//!
//! # Example
//!
//! ```rust,no_run
//! use guard_harness::{CommitExpectations, Harness, HarnessConfig, HookDescriptor};
//!
//! # async fn scenario() -> guard_harness::Result<()> {
//! let harness = Harness::new(HarnessConfig::new("."));
//! let repo = harness.create_repo().await?;
//! harness.install_hook(&repo, &HookDescriptor::new("pre-commit")).await?;
//! harness.place_fixture(&repo, "bad.js", None).await?;
//! harness.commit_all(&repo).await?.assert_rejected();
//! let _ = repo.destroy().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod expect;
pub mod fixture;
pub mod harness;
pub mod logging;
pub mod message;

pub use config::HarnessConfig;
pub use error::{Error, Result};
pub use expect::CommitExpectations;
pub use harness::{Harness, TmpRepo};
pub use message::forbidden_statement_message;

pub use guard_fs::Transform;
pub use guard_vcs::{BackendKind, HookDescriptor, Platform, RunReport};
