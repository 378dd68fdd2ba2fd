// External process launching.
//
// Three launch targets: the Unreal editor (via the solution's .uproject),
// the user's configured build/launch script, and the Steam build of the
// game. Each validates its precondition chain before touching the launcher,
// so the user sees exactly which piece is missing.

use crate::host::coordinator::{ContextClosed, Coordinator};
use crate::host::{Host, HostError};
use crate::models::Settings;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Launch failures. The `Display` text of every variant is the exact message
/// shown to the user.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("No solution is currently open.")]
    NoSolution,

    #[error("Unable to get solution path.")]
    NoSolutionPath,

    #[error("FactoryGame.uproject not found in:\n{0}")]
    ProjectFileMissing(Utf8PathBuf),

    #[error("Launch Script Path is not configured.")]
    ScriptNotConfigured,

    #[error("Script file not found at:\n{0}")]
    ScriptMissing(Utf8PathBuf),

    #[error("Satisfactory Steam Install Directory is not configured.")]
    SteamInstallNotConfigured,

    #[error("FactoryGameSteam.exe not found at:\n{0}")]
    GameExecutableMissing(Utf8PathBuf),

    #[error(transparent)]
    ContextClosed(#[from] ContextClosed),

    #[error(transparent)]
    Host(#[from] HostError),
}

/// Starts external processes related to the open solution.
pub struct LaunchService<H: Host> {
    coordinator: Coordinator<H>,
}

impl<H: Host> LaunchService<H> {
    pub fn new(coordinator: Coordinator<H>) -> Self {
        Self { coordinator }
    }

    /// Open the solution's `FactoryGame.uproject` in the Unreal editor.
    pub async fn launch_editor(&self) -> Result<(), LaunchError> {
        let solution_dir = self.solution_dir().await?;
        let uproject = solution_dir.join("FactoryGame.uproject");

        if !uproject.exists() {
            return Err(LaunchError::ProjectFileMissing(solution_dir));
        }

        tracing::info!("launching editor with {uproject}");
        self.launch(uproject, None).await
    }

    /// Run the user's configured launch script, with the script's directory
    /// as working directory.
    pub async fn launch_script(&self, settings: &Settings) -> Result<(), LaunchError> {
        let configured = settings.launch_script_path.trim();
        if configured.is_empty() {
            return Err(LaunchError::ScriptNotConfigured);
        }

        let script = Utf8PathBuf::from(configured);
        if !script.exists() {
            return Err(LaunchError::ScriptMissing(script));
        }

        let working_dir = script.parent().map(Utf8PathBuf::from);
        tracing::info!("launching script {script}");
        self.launch(script, working_dir).await
    }

    /// Start the Steam build of the game from its configured install.
    pub async fn launch_game(&self, settings: &Settings) -> Result<(), LaunchError> {
        let configured = settings.steam_install_location.trim();
        if configured.is_empty() {
            return Err(LaunchError::SteamInstallNotConfigured);
        }

        let install = Utf8PathBuf::from(configured);
        let executable = install.join("FactoryGameSteam.exe");
        if !executable.exists() {
            return Err(LaunchError::GameExecutableMissing(executable));
        }

        tracing::info!("launching game from {install}");
        self.launch(executable, Some(install)).await
    }

    async fn solution_dir(&self) -> Result<Utf8PathBuf, LaunchError> {
        let path = self
            .coordinator
            .call(|host| {
                let solution = host.solution();
                if !solution.is_open() {
                    return Err(LaunchError::NoSolution);
                }
                Ok(solution.full_path())
            })
            .await??;

        path.and_then(|p| p.parent().map(Utf8PathBuf::from))
            .ok_or(LaunchError::NoSolutionPath)
    }

    async fn launch(
        &self,
        path: Utf8PathBuf,
        working_dir: Option<Utf8PathBuf>,
    ) -> Result<(), LaunchError> {
        self.coordinator
            .call(move |host| host.launcher().launch(&path, working_dir.as_deref()))
            .await??;
        Ok(())
    }
}
