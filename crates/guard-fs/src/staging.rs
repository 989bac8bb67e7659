//! Async file operations for staging throwaway repositories
//!
//! Every operation completes only after its effect is on disk, so callers
//! can sequence steps (write hook, mark executable, commit) with `.await`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::{Error, Result};

/// Content rewrite applied between reading a file and writing its copy.
pub type Transform = fn(&str) -> String;

/// Create a single directory.
///
/// An existing directory at `path` is accepted. Any other failure,
/// including an existing non-directory entry, is returned.
pub async fn create_directory(path: &Path) -> Result<()> {
    match fs::create_dir(path).await {
        Ok(()) => {
            debug!(path = %path.display(), "created directory");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            let metadata = fs::metadata(path).await.map_err(|e| Error::io(path, e))?;
            if !metadata.is_dir() {
                return Err(Error::NotADirectory {
                    path: path.to_path_buf(),
                });
            }
            debug!(path = %path.display(), "directory already exists");
            Ok(())
        }
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Create `path` and any missing parents.
pub async fn create_directory_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .map_err(|e| Error::io(path, e))
}

/// Copy `source` into `dest_dir` under its own file name.
///
/// The source is read as UTF-8 text and passed through `transform` when one
/// is given. Returns the path of the written copy.
pub async fn copy_file(
    source: &Path,
    dest_dir: &Path,
    transform: Option<Transform>,
) -> Result<PathBuf> {
    let file_name = source.file_name().ok_or_else(|| Error::MissingFileName {
        path: source.to_path_buf(),
    })?;
    let dest = dest_dir.join(file_name);

    let content = read_text(source).await?;
    let content = match transform {
        Some(rewrite) => rewrite(&content),
        None => content,
    };

    fs::write(&dest, content)
        .await
        .map_err(|e| Error::io(&dest, e))?;

    debug!(
        source = %source.display(),
        dest = %dest.display(),
        transformed = transform.is_some(),
        "copied file"
    );
    Ok(dest)
}

/// Read a UTF-8 text file.
pub async fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .await
        .map_err(|e| Error::io(path, e))
}

/// Append `content` to the file at `path`, creating it if needed.
pub async fn append_file(path: &Path, content: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| Error::io(path, e))?;

    file.write_all(content.as_bytes())
        .await
        .map_err(|e| Error::io(path, e))?;
    file.flush().await.map_err(|e| Error::io(path, e))?;

    debug!(path = %path.display(), bytes = content.len(), "appended to file");
    Ok(())
}

/// Give the file at `path` read/write/execute permission for everyone.
#[cfg(unix)]
pub async fn chmod_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, std::fs::Permissions::from_mode(0o777))
        .await
        .map_err(|e| Error::io(path, e))?;
    debug!(path = %path.display(), "marked executable");
    Ok(())
}

/// Give the file at `path` read/write/execute permission for everyone.
///
/// Non-unix platforms have no execute bit; only clears the read-only flag.
#[cfg(not(unix))]
pub async fn chmod_executable(path: &Path) -> Result<()> {
    let metadata = fs::metadata(path).await.map_err(|e| Error::io(path, e))?;
    let mut permissions = metadata.permissions();
    #[allow(clippy::permissions_set_readonly_false)]
    permissions.set_readonly(false);
    fs::set_permissions(path, permissions)
        .await
        .map_err(|e| Error::io(path, e))?;
    debug!(path = %path.display(), "marked writable");
    Ok(())
}

/// Delete a directory tree. A missing `path` is not an error.
pub async fn remove_recursive(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => {
            debug!(path = %path.display(), "removed directory tree");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(path, e)),
    }
}
