//! Backend adapters
//!
//! Each supported tool gets a stateless adapter implementing [`VcsBackend`].
//! Adapters read everything they need (hook source directory, platform,
//! commit identity) from the [`BackendContext`] passed to each call.

mod git;
mod hg;

pub use git::GitBackend;
pub use hg::HgBackend;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hook::{HookDescriptor, Platform};
use crate::process::RunReport;

/// Supported version-control tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Git,
    Hg,
}

impl BackendKind {
    /// Short tag used in repository directory names.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Git => "git",
            Self::Hg => "hg",
        }
    }

    /// Name of the command-line tool.
    pub fn program(self) -> &'static str {
        self.tag()
    }

    /// The adapter for this tool.
    pub fn adapter(self) -> Box<dyn VcsBackend> {
        match self {
            Self::Git => Box::new(GitBackend),
            Self::Hg => Box::new(HgBackend),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "git" => Ok(Self::Git),
            "hg" | "mercurial" => Ok(Self::Hg),
            _ => Err(Error::UnknownBackend(s.to_string())),
        }
    }
}

/// Commit identity passed to the tool so commits work without user config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub email: String,
}

impl Default for Author {
    fn default() -> Self {
        Self {
            name: "Test User".to_string(),
            email: "test@test.com".to_string(),
        }
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Settings shared by every backend call in a scenario
#[derive(Debug, Clone)]
pub struct BackendContext {
    /// Directory holding hook sources, one file per hook name
    pub hooks_dir: PathBuf,
    /// Optional template for the hook-registration fragment
    pub registration_template: Option<PathBuf>,
    pub platform: Platform,
    pub commit_message: String,
    pub author: Author,
}

impl BackendContext {
    pub fn new(hooks_dir: impl Into<PathBuf>) -> Self {
        Self {
            hooks_dir: hooks_dir.into(),
            registration_template: None,
            platform: Platform::current(),
            commit_message: "test Commit".to_string(),
            author: Author::default(),
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_registration_template(mut self, template: impl Into<PathBuf>) -> Self {
        self.registration_template = Some(template.into());
        self
    }

    /// Source path of a hook file.
    pub fn hook_source(&self, file_name: &str) -> PathBuf {
        self.hooks_dir.join(file_name)
    }
}

/// Operations every backend supports over a repository directory.
///
/// Lifecycle: `initialize` → `install_hook` → `commit_all` (repeatable).
#[async_trait]
pub trait VcsBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Create `repo_dir` and initialise an empty repository in it.
    async fn initialize(&self, ctx: &BackendContext, repo_dir: &Path) -> Result<()>;

    /// Install `hook` into the repository and make it executable.
    async fn install_hook(
        &self,
        ctx: &BackendContext,
        hook: &HookDescriptor,
        repo_dir: &Path,
    ) -> Result<()>;

    /// Stage every change and commit.
    ///
    /// Returns `Err` only for failures before the commit itself. A rejected
    /// commit is reported through the returned [`RunReport`].
    async fn commit_all(&self, ctx: &BackendContext, repo_dir: &Path) -> Result<RunReport>;
}
