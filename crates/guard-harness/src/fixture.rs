//! Fixture placement

use std::path::{Path, PathBuf};

use guard_fs::{Transform, staging, validate_component};
use tracing::debug;

use crate::error::Result;

/// Copy fixture `name` from `fixtures_dir` into `repo_dir`.
///
/// `transform`, when given, rewrites the fixture's content on the way.
/// The fixture file itself is never modified. Returns the written path.
pub async fn place_fixture(
    fixtures_dir: &Path,
    name: &str,
    transform: Option<Transform>,
    repo_dir: &Path,
) -> Result<PathBuf> {
    validate_component(name)?;
    let placed = staging::copy_file(&fixtures_dir.join(name), repo_dir, transform).await?;
    debug!(fixture = name, repo = %repo_dir.display(), "placed fixture");
    Ok(placed)
}
