//! Git adapter
//!
//! Hooks are picked up by file name from `.git/hooks`, so no event type is
//! needed. All commands run from the repository directory with explicit
//! `--git-dir`/`--work-tree` flags.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use guard_fs::{staging, validate_component};
use tracing::{debug, info};

use super::{BackendContext, BackendKind, VcsBackend};
use crate::error::Result;
use crate::hook::HookDescriptor;
use crate::process::{self, RunReport, VcsCommand};

const GIT_DIR: &str = ".git";

/// Adapter for the `git` command-line tool
#[derive(Debug, Clone, Copy, Default)]
pub struct GitBackend;

impl GitBackend {
    /// Where installed hooks live inside a repository.
    pub fn hooks_dir(repo_dir: &Path) -> PathBuf {
        repo_dir.join(GIT_DIR).join("hooks")
    }

    fn init_command(repo_dir: &Path) -> VcsCommand {
        VcsCommand::new("git")
            .arg(format!("--git-dir={GIT_DIR}"))
            .arg("init")
            .current_dir(repo_dir)
    }

    fn repo_command(repo_dir: &Path) -> VcsCommand {
        VcsCommand::new("git")
            .arg(format!("--git-dir={GIT_DIR}"))
            .arg("--work-tree=.")
            .current_dir(repo_dir)
    }

    fn add_command(repo_dir: &Path) -> VcsCommand {
        Self::repo_command(repo_dir).args(["add", "--all"])
    }

    fn commit_command(ctx: &BackendContext, repo_dir: &Path) -> VcsCommand {
        VcsCommand::new("git")
            .arg("-c")
            .arg(format!("user.name={}", ctx.author.name))
            .arg("-c")
            .arg(format!("user.email={}", ctx.author.email))
            .args(["-c", "commit.gpgsign=false"])
            .arg(format!("--git-dir={GIT_DIR}"))
            .arg("--work-tree=.")
            .args(["commit", "-m"])
            .arg(ctx.commit_message.as_str())
            .current_dir(repo_dir)
    }
}

#[async_trait]
impl VcsBackend for GitBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Git
    }

    async fn initialize(&self, _ctx: &BackendContext, repo_dir: &Path) -> Result<()> {
        staging::create_directory(repo_dir).await?;
        process::run_checked(&Self::init_command(repo_dir)).await?;
        info!(repo = %repo_dir.display(), "initialized git repository");
        Ok(())
    }

    async fn install_hook(
        &self,
        ctx: &BackendContext,
        hook: &HookDescriptor,
        repo_dir: &Path,
    ) -> Result<()> {
        validate_component(&hook.name)?;
        if let Some(event) = &hook.event {
            debug!(hook = %hook.name, event = %event, "git infers the event from the hook name");
        }

        let hooks_dest = Self::hooks_dir(repo_dir);
        // `git init` without templates leaves no hooks directory.
        staging::create_directory(&hooks_dest).await?;

        let installed = staging::copy_file(&ctx.hook_source(&hook.name), &hooks_dest, None).await?;
        staging::chmod_executable(&installed).await?;

        info!(hook = %hook.name, repo = %repo_dir.display(), "installed git hook");
        Ok(())
    }

    async fn commit_all(&self, ctx: &BackendContext, repo_dir: &Path) -> Result<RunReport> {
        process::run_checked(&Self::add_command(repo_dir)).await?;

        let report = process::run_report(&Self::commit_command(ctx, repo_dir)).await;
        info!(
            repo = %repo_dir.display(),
            accepted = report.succeeded(),
            "git commit finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_init_command_targets_metadata_dir() {
        let cmd = GitBackend::init_command(Path::new("data/git_test1"));
        assert_eq!(cmd.to_string(), "git --git-dir=.git init");
    }

    #[test]
    fn test_commit_command_shape() {
        let ctx = BackendContext::new("hooks");
        let cmd = GitBackend::commit_command(&ctx, Path::new("repo"));
        assert_eq!(
            cmd.to_string(),
            "git -c \"user.name=Test User\" -c user.email=test@test.com -c commit.gpgsign=false \
             --git-dir=.git --work-tree=. commit -m \"test Commit\""
        );
    }

    #[test]
    fn test_add_command_stages_everything() {
        let cmd = GitBackend::add_command(Path::new("repo"));
        assert_eq!(&cmd.get_args()[2..], &["add".to_string(), "--all".to_string()]);
    }

    #[tokio::test]
    async fn test_install_hook_copies_and_marks_executable() {
        let temp = TempDir::new().unwrap();
        let hooks_src = temp.path().join("hooks");
        std::fs::create_dir(&hooks_src).unwrap();
        std::fs::write(hooks_src.join("pre-commit"), "#!/bin/sh\nexit 0\n").unwrap();

        // Only the directory layout matters here; no git needed.
        let repo = temp.path().join("repo");
        std::fs::create_dir_all(repo.join(".git")).unwrap();

        let ctx = BackendContext::new(&hooks_src);
        GitBackend
            .install_hook(&ctx, &HookDescriptor::new("pre-commit"), &repo)
            .await
            .unwrap();

        let installed = repo.join(".git/hooks/pre-commit");
        assert_eq!(
            std::fs::read_to_string(&installed).unwrap(),
            "#!/bin/sh\nexit 0\n"
        );
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&installed).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o777);
        }
    }

    #[tokio::test]
    async fn test_install_hook_rejects_path_names() {
        let temp = TempDir::new().unwrap();
        let ctx = BackendContext::new(temp.path());
        let err = GitBackend
            .install_hook(&ctx, &HookDescriptor::new("../pre-commit"), temp.path())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Fs(guard_fs::Error::InvalidName { .. })));
    }

    #[tokio::test]
    async fn test_install_missing_hook_source_fails() {
        let temp = TempDir::new().unwrap();
        let repo = temp.path().join("repo");
        std::fs::create_dir_all(repo.join(".git")).unwrap();

        let ctx = BackendContext::new(temp.path().join("hooks"));
        let result = GitBackend
            .install_hook(&ctx, &HookDescriptor::new("pre-commit"), &repo)
            .await;
        assert!(matches!(result, Err(Error::Fs(guard_fs::Error::Io { .. }))));
    }
}
