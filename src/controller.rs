//! Top-level controller wiring the services to the host's commands.
//!
//! The extension shell constructs exactly one controller per host session
//! and routes its toolbar commands here. Every entry point is fire-safe:
//! failures are surfaced to the user through the host's alert sink and never
//! propagate back into the host.

use crate::config::SettingsManager;
use crate::host::coordinator::Coordinator;
use crate::host::{Host, ToastPresenter};
use crate::models::Settings;
use crate::services::correlate::BuildCompletionCorrelator;
use crate::services::deploy::ModDeploymentPipeline;
use crate::services::dispatch::{BuildDispatcher, DispatchError};
use crate::services::launch::{LaunchError, LaunchService};
use crate::services::notify::NotificationService;
use crate::state::BuildRequestRegistry;
use anyhow::Result;
use std::sync::Arc;

/// The editor build every toolbar session starts from.
const EDITOR_CONFIG: &str = "Development Editor";
const EDITOR_PLATFORM: &str = "Win64";
const EDITOR_PROJECT: &str = "FactoryGame";
const EDITOR_DISPLAY_NAME: &str = "Build Editor";

/// Orchestrates the build, launch, and completion pipeline for one host
/// session.
pub struct QuickBuildController<H: Host> {
    coordinator: Coordinator<H>,
    settings: SettingsManager,
    dispatcher: BuildDispatcher<H>,
    launcher: LaunchService<H>,
    correlator: Arc<BuildCompletionCorrelator<H>>,
}

impl<H: Host> QuickBuildController<H> {
    /// Wire up the controller. Settings are loaded once here for the settle
    /// delay; everything else reads them fresh per operation.
    pub fn new(
        coordinator: Coordinator<H>,
        settings: SettingsManager,
        toasts: Arc<dyn ToastPresenter>,
    ) -> Result<Self> {
        let config = settings.load()?;
        let registry = Arc::new(BuildRequestRegistry::new());

        let dispatcher = BuildDispatcher::new(
            coordinator.clone(),
            Arc::clone(&registry),
            config.settings.settle_delay(),
        );
        let launcher = LaunchService::new(coordinator.clone());
        let notifier = Arc::new(NotificationService::new(coordinator.clone(), toasts));
        let correlator = BuildCompletionCorrelator::new(
            coordinator.clone(),
            registry,
            settings.clone(),
            notifier,
            Arc::new(ModDeploymentPipeline::new()),
        );

        Ok(Self {
            coordinator,
            settings,
            dispatcher,
            launcher,
            correlator,
        })
    }

    /// Start listening for build completion signals. Idempotent.
    pub async fn start(&self) -> Result<()> {
        let events = self
            .coordinator
            .call(|host| host.build_events())
            .await
            .map_err(anyhow::Error::from)?;
        Arc::clone(&self.correlator).subscribe(events);
        Ok(())
    }

    /// Build the editor: `Development Editor|Win64` on the FactoryGame
    /// project.
    pub async fn build_editor(&self) {
        self.build(EDITOR_CONFIG, EDITOR_PLATFORM, EDITOR_PROJECT, EDITOR_DISPLAY_NAME)
            .await;
    }

    /// Build `project_name` under an arbitrary (configuration, platform)
    /// pair. Failures are alerted, never returned.
    pub async fn build(
        &self,
        config_name: &str,
        platform: &str,
        project_name: &str,
        display_name: &str,
    ) {
        if let Err(e) = self
            .dispatcher
            .dispatch(config_name, platform, project_name, display_name)
            .await
        {
            tracing::error!("dispatching '{display_name}' failed: {e}");
            let message = match &e {
                DispatchError::NoSolution
                | DispatchError::ProjectNotFound(_)
                | DispatchError::ConfigurationNotFound { .. } => e.to_string(),
                DispatchError::ContextClosed(_) | DispatchError::Host(_) => {
                    format!("Error building solution: {e}")
                }
            };
            self.alert("Build Error", message).await;
        }
    }

    /// Open the solution's FactoryGame.uproject in the Unreal editor.
    pub async fn launch_editor(&self) {
        if let Err(e) = self.launcher.launch_editor().await {
            self.alert_launch("editor", e).await;
        }
    }

    /// Run the configured launch script.
    pub async fn launch_script(&self) {
        let settings = match self.load_settings() {
            Ok(settings) => settings,
            Err(message) => return self.alert("Launch Error", message).await,
        };
        if let Err(e) = self.launcher.launch_script(&settings).await {
            self.alert_launch("script", e).await;
        }
    }

    /// Start the Steam build of the game.
    pub async fn launch_game(&self) {
        let settings = match self.load_settings() {
            Ok(settings) => settings,
            Err(message) => return self.alert("Launch Error", message).await,
        };
        if let Err(e) = self.launcher.launch_game(&settings).await {
            self.alert_launch("game", e).await;
        }
    }

    /// Mods present under the game project's Mods folder, for the options
    /// page's mod list. Failures read as an empty list.
    pub async fn discover_mods(&self) -> Vec<String> {
        let discovered = self
            .coordinator
            .call(|host| {
                let projects = host.solution().projects();
                crate::services::resolve::discover_mods(&projects, EDITOR_PROJECT)
            })
            .await;

        match discovered {
            Ok(mods) => mods,
            Err(e) => {
                tracing::debug!("mod discovery failed: {e}");
                Vec::new()
            }
        }
    }

    /// Whether the open solution is the FactoryGame solution. Used by the
    /// shell to decide toolbar visibility; any failure reads as "no".
    pub async fn is_factory_game_solution(&self) -> bool {
        let path = match self
            .coordinator
            .call(|host| host.solution().full_path())
            .await
        {
            Ok(Some(path)) => path,
            Ok(None) => return false,
            Err(e) => {
                tracing::debug!("solution identity check failed: {e}");
                return false;
            }
        };

        path.file_stem()
            .is_some_and(|stem| stem.eq_ignore_ascii_case("FactoryGame"))
    }

    fn load_settings(&self) -> Result<Settings, String> {
        match self.settings.load() {
            Ok(config) => Ok(config.settings),
            Err(e) => {
                tracing::error!("loading settings failed: {e:#}");
                Err(format!("Error loading settings: {e}"))
            }
        }
    }

    async fn alert_launch(&self, target: &str, error: LaunchError) {
        tracing::error!("launching {target} failed: {error}");
        let message = match &error {
            LaunchError::ContextClosed(_) | LaunchError::Host(_) => {
                format!("Error launching {target}: {error}")
            }
            _ => error.to_string(),
        };
        self.alert("Launch Error", message).await;
    }

    async fn alert(&self, caption: &'static str, message: String) {
        let delivered = self
            .coordinator
            .call(move |host| host.alerts().error(caption, &message))
            .await;
        if let Err(e) = delivered {
            tracing::error!("alert not delivered: {e}");
        }
    }
}
