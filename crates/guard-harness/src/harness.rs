//! Scenario surface: one [`Harness`] per backend, one [`TmpRepo`] per scenario

use std::path::{Path, PathBuf};

use guard_fs::{Transform, random_repo_dir, staging};
use guard_vcs::{BackendContext, BackendKind, HookDescriptor, RunReport, VcsBackend};
use tracing::{debug, info, warn};

use crate::config::HarnessConfig;
use crate::error::Result;
use crate::fixture;

/// Drives scenarios against the backend selected by its config.
pub struct Harness {
    config: HarnessConfig,
    ctx: BackendContext,
    backend: Box<dyn VcsBackend>,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Self {
        let ctx = config.backend_context();
        let backend = config.backend.adapter();
        Self {
            config,
            ctx,
            backend,
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn backend(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Reserve a fresh repository path under the data directory.
    ///
    /// Creates the data directory if needed but not the repository itself.
    pub async fn allocate(&self) -> Result<TmpRepo> {
        staging::create_directory_all(&self.config.data_dir).await?;
        let path = random_repo_dir(&self.config.data_dir, self.backend().tag())?;
        Ok(TmpRepo::new(path))
    }

    /// Allocate and initialise a new repository.
    pub async fn create_repo(&self) -> Result<TmpRepo> {
        let repo = self.allocate().await?;
        self.initialize(&repo).await?;
        Ok(repo)
    }

    pub async fn initialize(&self, repo: &TmpRepo) -> Result<()> {
        self.backend.initialize(&self.ctx, repo.path()).await?;
        Ok(())
    }

    pub async fn install_hook(&self, repo: &TmpRepo, hook: &HookDescriptor) -> Result<()> {
        self.backend.install_hook(&self.ctx, hook, repo.path()).await?;
        Ok(())
    }

    /// Copy a fixture from the configured fixtures directory into `repo`.
    pub async fn place_fixture(
        &self,
        repo: &TmpRepo,
        name: &str,
        transform: Option<Transform>,
    ) -> Result<PathBuf> {
        fixture::place_fixture(&self.config.fixtures_dir, name, transform, repo.path()).await
    }

    /// Stage and commit everything in `repo`.
    ///
    /// The report says whether the hook let the commit through; `Err` means
    /// the scenario could not get as far as the commit.
    pub async fn commit_all(&self, repo: &TmpRepo) -> Result<RunReport> {
        Ok(self.backend.commit_all(&self.ctx, repo.path()).await?)
    }

    /// Run a whole scenario: fresh repository, `hook` installed, `fixtures`
    /// placed untransformed, one commit. The repository is removed before
    /// returning.
    pub async fn commit_fixtures(
        &self,
        hook: &HookDescriptor,
        fixtures: &[&str],
    ) -> Result<RunReport> {
        let repo = self.allocate().await?;
        self.initialize(&repo).await?;
        self.install_hook(&repo, hook).await?;
        for name in fixtures {
            self.place_fixture(&repo, name, None).await?;
        }
        let report = self.commit_all(&repo).await?;
        info!(
            backend = %self.backend(),
            fixtures = ?fixtures,
            accepted = report.succeeded(),
            "scenario finished"
        );
        if let Err(e) = repo.destroy().await {
            // Already logged by `destroy`; teardown never fails a scenario.
            debug!(error = %e, "ignoring teardown failure");
        }
        Ok(report)
    }
}

/// A temporary repository owned by one scenario.
///
/// Removed by [`TmpRepo::destroy`], or on drop if that was never awaited.
#[derive(Debug)]
pub struct TmpRepo {
    path: PathBuf,
    destroyed: bool,
}

impl TmpRepo {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            destroyed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the repository. Failures are logged and returned, never fatal.
    pub async fn destroy(mut self) -> Result<()> {
        self.destroyed = true;
        let result = staging::remove_recursive(&self.path).await;
        if let Err(e) = &result {
            warn!(repo = %self.path.display(), error = %e, "failed to remove test repository");
        }
        Ok(result?)
    }
}

impl Drop for TmpRepo {
    fn drop(&mut self) {
        if self.destroyed {
            return;
        }
        // Blocking removal on whatever thread drops the handle. Only reached
        // when a scenario bailed out before awaiting `destroy`.
        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(repo = %self.path.display(), error = %e, "failed to remove test repository");
            }
        }
    }
}
