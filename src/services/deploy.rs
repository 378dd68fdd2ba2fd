// Mod binary deployment.
//
// After a successful build, shipping binaries are copied from the solution's
// Mods tree into the matching game install. Which install receives the files
// is classified from the human-readable build name; builds that name no
// channel deploy nothing.

use crate::models::Settings;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Target game installation a build's binaries belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployChannel {
    Steam,
    Epic,
    DedicatedServer,
}

impl DeployChannel {
    /// Classify a build's display name into a deployment channel.
    ///
    /// Matching is case-insensitive substring search, checked in order:
    /// "steam", then "epic", then "win server" or "server". Names matching
    /// none deploy nowhere.
    pub fn classify(build_name: &str) -> Option<Self> {
        let name = build_name.to_lowercase();
        if name.contains("steam") {
            Some(Self::Steam)
        } else if name.contains("epic") {
            Some(Self::Epic)
        } else if name.contains("win server") || name.contains("server") {
            Some(Self::DedicatedServer)
        } else {
            None
        }
    }

    /// Filename prefix of the shipping binaries produced for this channel.
    pub fn file_prefix(self) -> &'static str {
        match self {
            Self::Steam => "FactoryGameSteam-",
            Self::Epic => "FactoryGameEGS-",
            Self::DedicatedServer => "FactoryServer-",
        }
    }
}

/// Configured install roots, one per channel. Unconfigured channels are
/// `None` and silently skipped at deploy time.
#[derive(Debug, Clone, Default)]
pub struct InstallLocations {
    steam: Option<Utf8PathBuf>,
    epic: Option<Utf8PathBuf>,
    dedicated_server: Option<Utf8PathBuf>,
}

impl InstallLocations {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            steam: non_empty_path(&settings.steam_install_location),
            epic: non_empty_path(&settings.epic_install_location),
            dedicated_server: non_empty_path(&settings.server_install_location),
        }
    }

    pub fn for_channel(&self, channel: DeployChannel) -> Option<&Utf8Path> {
        match channel {
            DeployChannel::Steam => self.steam.as_deref(),
            DeployChannel::Epic => self.epic.as_deref(),
            DeployChannel::DedicatedServer => self.dedicated_server.as_deref(),
        }
    }
}

fn non_empty_path(value: &str) -> Option<Utf8PathBuf> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(Utf8PathBuf::from(trimmed))
    }
}

/// Summary of a deployment run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploySummary {
    /// Mods whose binaries were copied.
    pub deployed: Vec<String>,
    /// Mods skipped because no shipping binaries existed for the channel.
    pub skipped: Vec<String>,
    /// Mods that hit a filesystem error; other mods still deploy.
    pub failed: Vec<String>,
}

impl DeploySummary {
    pub fn is_noop(&self) -> bool {
        self.deployed.is_empty() && self.skipped.is_empty() && self.failed.is_empty()
    }
}

/// Copies built mod binaries into the classified game install.
#[derive(Debug, Clone, Default)]
pub struct ModDeploymentPipeline;

impl ModDeploymentPipeline {
    pub fn new() -> Self {
        Self
    }

    /// Deploy the enabled mods' binaries for `build_name`.
    ///
    /// Returns a no-op summary when the build name classifies to no channel
    /// or the channel has no configured install. Per-mod failures are
    /// recorded and do not stop the remaining mods.
    pub async fn deploy(
        &self,
        solution_dir: Utf8PathBuf,
        build_name: String,
        mods: Vec<String>,
        installs: InstallLocations,
    ) -> DeploySummary {
        let Some(channel) = DeployChannel::classify(&build_name) else {
            tracing::debug!("build '{build_name}' names no deployment channel, skipping");
            return DeploySummary::default();
        };

        let Some(install_root) = installs.for_channel(channel).map(Utf8Path::to_path_buf) else {
            tracing::info!("no install location configured for {channel:?}, skipping deployment");
            return DeploySummary::default();
        };

        let result = tokio::task::spawn_blocking(move || {
            deploy_all(&solution_dir, channel, &mods, &install_root)
        })
        .await;

        match result {
            Ok(summary) => {
                tracing::info!(
                    "deployment for '{build_name}': {} deployed, {} skipped, {} failed",
                    summary.deployed.len(),
                    summary.skipped.len(),
                    summary.failed.len()
                );
                summary
            }
            Err(e) => {
                tracing::error!("deployment task panicked: {e}");
                DeploySummary::default()
            }
        }
    }
}

fn deploy_all(
    solution_dir: &Utf8Path,
    channel: DeployChannel,
    mods: &[String],
    install_root: &Utf8Path,
) -> DeploySummary {
    let mut summary = DeploySummary::default();

    for mod_name in mods {
        match deploy_mod(solution_dir, channel, mod_name, install_root) {
            Ok(true) => summary.deployed.push(mod_name.clone()),
            Ok(false) => {
                tracing::debug!("no {channel:?} binaries for mod '{mod_name}'");
                summary.skipped.push(mod_name.clone());
            }
            Err(e) => {
                tracing::warn!("deploying mod '{mod_name}' failed: {e:#}");
                summary.failed.push(mod_name.clone());
            }
        }
    }

    summary
}

/// Copy one mod's shipping dll and pdb. Returns `Ok(false)` when the source
/// binaries do not exist, `Ok(true)` when at least one file was copied.
fn deploy_mod(
    solution_dir: &Utf8Path,
    channel: DeployChannel,
    mod_name: &str,
    install_root: &Utf8Path,
) -> Result<bool> {
    let source_dir = solution_dir
        .join("Mods")
        .join(mod_name)
        .join("Binaries")
        .join("Win64");

    if !source_dir.exists() {
        return Ok(false);
    }

    let dest_dir = install_root
        .join("FactoryGame")
        .join("Mods")
        .join(mod_name)
        .join("Binaries")
        .join("Win64");

    let stem = format!("{}{}-Win64-Shipping", channel.file_prefix(), mod_name);
    let mut copied = false;

    for extension in ["dll", "pdb"] {
        let file_name = format!("{stem}.{extension}");
        let source = source_dir.join(&file_name);
        if !source.exists() {
            continue;
        }

        if !copied {
            fs::create_dir_all(&dest_dir)
                .with_context(|| format!("Failed to create deploy directory: {dest_dir}"))?;
        }

        let dest = dest_dir.join(&file_name);
        fs::copy(&source, &dest).with_context(|| format!("Failed to copy {source} to {dest}"))?;
        tracing::debug!("copied {file_name} to {dest_dir}");
        copied = true;
    }

    Ok(copied)
}
