//! Names for temporary repositories and staged files

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::{Error, Result};

/// Infix between the backend tag and the unique suffix.
pub const TEST_INFIX: &str = "_test";

/// Length of the random hex component appended after the timestamp.
const RANDOM_LEN: usize = 8;

/// Check that `name` is a single, plain path component.
///
/// Rejects empty names, `.`/`..`, separators and NUL so that joining the
/// name onto a root can never leave that root.
pub fn validate_component(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_name(name, "name is empty"));
    }
    if name == "." || name == ".." {
        return Err(Error::invalid_name(name, "relative directory reference"));
    }
    if name.contains(['/', '\\']) {
        return Err(Error::invalid_name(name, "contains a path separator"));
    }
    if name.contains('\0') {
        return Err(Error::invalid_name(name, "contains NUL"));
    }
    Ok(())
}

/// Build a fresh repository path under `root`.
///
/// The directory name is `<tag>_test<millis><random>`. The tag may only
/// contain ASCII alphanumerics, `-` and `_`. Nothing is created on disk.
pub fn random_repo_dir(root: &Path, backend_tag: &str) -> Result<PathBuf> {
    if backend_tag.is_empty() {
        return Err(Error::invalid_name(backend_tag, "backend tag is empty"));
    }
    if !backend_tag
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(Error::invalid_name(
            backend_tag,
            "backend tag must be alphanumeric, '-' or '_'",
        ));
    }

    let millis = chrono::Utc::now().timestamp_millis();
    let random = Uuid::new_v4().simple().to_string();
    let name = format!(
        "{backend_tag}{TEST_INFIX}{millis}{}",
        &random[..RANDOM_LEN]
    );

    Ok(root.join(name))
}
