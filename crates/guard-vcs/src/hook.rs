//! Hook descriptors and platform handling

use std::fmt;

use serde::{Deserialize, Serialize};

/// Platform the hook will run on.
///
/// Decides whether a wrapper script is installed next to the hook and
/// whether registration paths need rewriting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Unix,
    Windows,
}

impl Platform {
    /// The platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unix
        }
    }

    /// Whether hooks need a `.bat` wrapper to be runnable.
    pub fn requires_wrapper(self) -> bool {
        matches!(self, Self::Windows)
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unix => write!(f, "unix"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

/// A hook to install: the file name under the hook source directory, plus
/// the event it binds to for backends that register hooks by event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookDescriptor {
    pub name: String,
    pub event: Option<String>,
}

impl HookDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            event: None,
        }
    }

    /// Bind the hook to an event (e.g. `precommit`).
    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    /// File name of the platform wrapper for this hook.
    pub fn wrapper_name(&self) -> String {
        format!("{}.bat", self.name)
    }
}

/// Rewrite a registration fragment for Windows.
///
/// Drops `./` after a space (relative command paths) and turns forward
/// slashes into backslashes.
pub fn fix_paths_for_windows(content: &str) -> String {
    content.replace(" ./", " ").replace('/', "\\")
}
