//! Version-control backends for commit-guard scenarios
//!
//! This crate drives the `git` and `hg` command-line tools. It provides:
//!
//! - [`process`]: running external commands, either requiring success or
//!   reporting the outcome back to the caller
//! - [`hook`]: hook descriptors, platform detection and platform path rewriting
//! - [`backend`]: the [`VcsBackend`] trait with one adapter per tool

pub mod backend;
pub mod error;
pub mod hook;
pub mod process;

pub use backend::{Author, BackendContext, BackendKind, GitBackend, HgBackend, VcsBackend};
pub use error::{Error, Result};
pub use hook::{HookDescriptor, Platform};
pub use process::{RunReport, VcsCommand};
