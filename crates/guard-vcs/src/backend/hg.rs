//! Mercurial adapter
//!
//! Mercurial registers hooks by event name in `.hg/hgrc`, so every hook
//! installed here needs an event type. The hook file itself is kept in
//! `.hg/` next to the config that points at it.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use guard_fs::{staging, validate_component};
use tracing::{debug, info};

use super::{BackendContext, BackendKind, VcsBackend};
use crate::error::{Error, Result};
use crate::hook::{HookDescriptor, fix_paths_for_windows};
use crate::process::{self, RunReport, VcsCommand};

const HG_DIR: &str = ".hg";
const CONFIG_FILE: &str = "hgrc";

/// Adapter for the `hg` command-line tool
#[derive(Debug, Clone, Copy, Default)]
pub struct HgBackend;

impl HgBackend {
    /// Repository metadata directory, where hooks and `hgrc` are placed.
    pub fn metadata_dir(repo_dir: &Path) -> PathBuf {
        repo_dir.join(HG_DIR)
    }

    /// Config fragment binding `event` to a hook stored in `.hg/`.
    pub fn render_registration(event: &str, hook_name: &str) -> String {
        format!("[hooks]\n{event} = ./{HG_DIR}/{hook_name}\n")
    }

    fn init_command(repo_dir: &Path) -> VcsCommand {
        VcsCommand::new("hg")
            .arg("init")
            .arg(repo_dir.display().to_string())
    }

    fn commit_command(ctx: &BackendContext, repo_dir: &Path) -> VcsCommand {
        VcsCommand::new("hg")
            .arg("--cwd")
            .arg(repo_dir.display().to_string())
            .arg("--config")
            .arg(format!("ui.username={}", ctx.author))
            .args(["commit", "--addremove", "-m"])
            .arg(ctx.commit_message.as_str())
            .arg(".")
    }

    async fn registration_fragment(
        ctx: &BackendContext,
        event: &str,
        hook_name: &str,
    ) -> Result<String> {
        let fragment = match &ctx.registration_template {
            Some(template) => {
                debug!(template = %template.display(), "using registration template");
                staging::read_text(template).await?
            }
            None => Self::render_registration(event, hook_name),
        };

        if ctx.platform.requires_wrapper() {
            Ok(fix_paths_for_windows(&fragment))
        } else {
            Ok(fragment)
        }
    }
}

#[async_trait]
impl VcsBackend for HgBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Hg
    }

    async fn initialize(&self, _ctx: &BackendContext, repo_dir: &Path) -> Result<()> {
        staging::create_directory(repo_dir).await?;
        process::run_checked(&Self::init_command(repo_dir)).await?;
        info!(repo = %repo_dir.display(), "initialized hg repository");
        Ok(())
    }

    async fn install_hook(
        &self,
        ctx: &BackendContext,
        hook: &HookDescriptor,
        repo_dir: &Path,
    ) -> Result<()> {
        let event = hook.event.as_deref().ok_or_else(|| Error::MissingHookEvent {
            backend: BackendKind::Hg,
            hook: hook.name.clone(),
        })?;
        validate_component(&hook.name)?;
        validate_component(event)?;

        let hg_dir = Self::metadata_dir(repo_dir);
        let installed = staging::copy_file(&ctx.hook_source(&hook.name), &hg_dir, None).await?;

        let fragment = Self::registration_fragment(ctx, event, &hook.name).await?;
        staging::append_file(&hg_dir.join(CONFIG_FILE), &fragment).await?;

        if ctx.platform.requires_wrapper() {
            staging::copy_file(&ctx.hook_source(&hook.wrapper_name()), &hg_dir, None).await?;
        }

        staging::chmod_executable(&installed).await?;

        info!(
            hook = %hook.name,
            event = %event,
            platform = %ctx.platform,
            repo = %repo_dir.display(),
            "installed hg hook"
        );
        Ok(())
    }

    async fn commit_all(&self, ctx: &BackendContext, repo_dir: &Path) -> Result<RunReport> {
        let report = process::run_report(&Self::commit_command(ctx, repo_dir)).await;
        info!(
            repo = %repo_dir.display(),
            accepted = report.succeeded(),
            "hg commit finished"
        );
        Ok(report)
    }
}
