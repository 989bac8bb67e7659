//! Harness configuration
//!
//! Replaces fixed locations with explicit settings chosen when the harness
//! is built. Can be assembled in code or loaded from TOML:
//!
//! ```toml
//! backend = "hg"
//! hooks_dir = "src"
//! fixtures_dir = "test/fixtures"
//! data_dir = "test"
//!
//! [author]
//! name = "CI"
//! email = "ci@example.com"
//! ```
//!
//! Relative paths in a loaded file are resolved against the file's directory.

use std::path::{Path, PathBuf};

use guard_vcs::{Author, BackendContext, BackendKind, Platform};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default location of hook sources, relative to the project root
pub const DEFAULT_HOOKS_DIR: &str = "src";
/// Default location of fixture files, relative to the project root
pub const DEFAULT_FIXTURES_DIR: &str = "test/fixtures";
/// Default root for temporary repositories, relative to the project root
pub const DEFAULT_DATA_DIR: &str = "test";
pub const DEFAULT_COMMIT_MESSAGE: &str = "test Commit";
/// Fixture picked up as the registration template when none is configured
pub const REGISTRATION_FIXTURE: &str = "hgrc";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Backend every scenario built from this config runs against
    pub backend: BackendKind,
    /// Directory holding hook sources (and their `.bat` wrappers)
    pub hooks_dir: PathBuf,
    /// Directory holding files to be committed
    pub fixtures_dir: PathBuf,
    /// Parent of all temporary repositories
    pub data_dir: PathBuf,
    /// Optional template for backends that register hooks in a config file
    pub registration_template: Option<PathBuf>,
    pub platform: Platform,
    pub commit_message: String,
    pub author: Author,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Git,
            hooks_dir: PathBuf::from(DEFAULT_HOOKS_DIR),
            fixtures_dir: PathBuf::from(DEFAULT_FIXTURES_DIR),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            registration_template: None,
            platform: Platform::current(),
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
            author: Author::default(),
        }
    }
}

impl HarnessConfig {
    /// Default layout rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self::default().resolve_against(root.as_ref())
    }

    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_hooks_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.hooks_dir = dir.into();
        self
    }

    pub fn with_fixtures_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fixtures_dir = dir.into();
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_registration_template(mut self, template: impl Into<PathBuf>) -> Self {
        self.registration_template = Some(template.into());
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = message.into();
        self
    }

    /// Parse a TOML document. Paths are kept as written.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::InvalidConfig {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config file, resolving relative paths against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(config.resolve_against(base))
    }

    /// Settings handed to backend adapters.
    pub fn backend_context(&self) -> BackendContext {
        let mut ctx = BackendContext::new(&self.hooks_dir).with_platform(self.platform);
        if let Some(template) = self.registration_template_path() {
            ctx = ctx.with_registration_template(template);
        }
        ctx.commit_message = self.commit_message.clone();
        ctx.author = self.author.clone();
        ctx
    }

    /// Registration template to use: the configured one, else
    /// `<fixtures_dir>/hgrc` when that file exists.
    pub fn registration_template_path(&self) -> Option<PathBuf> {
        if let Some(template) = &self.registration_template {
            return Some(template.clone());
        }
        let fixture = self.fixtures_dir.join(REGISTRATION_FIXTURE);
        fixture.is_file().then_some(fixture)
    }

    fn validate(&self) -> Result<()> {
        if self.commit_message.trim().is_empty() {
            return Err(Error::InvalidConfig {
                message: "commit_message must not be empty".to_string(),
            });
        }
        Ok(())
    }

    fn resolve_against(mut self, base: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_absolute() { p } else { base.join(p) };
        self.hooks_dir = resolve(self.hooks_dir);
        self.fixtures_dir = resolve(self.fixtures_dir);
        self.data_dir = resolve(self.data_dir);
        self.registration_template = self.registration_template.map(resolve);
        self
    }
}
