// Build completion correlation.
//
// The host signals when any build finishes; it does not say which. This
// service pairs each signal with the oldest pending build request, reads the
// actual outcome from the solution, and fans out to notification and (on
// success) mod deployment. Signals with no pending request belong to builds
// this system did not dispatch and are dropped.

use crate::config::SettingsManager;
use crate::host::coordinator::Coordinator;
use crate::host::{BuildFinished, Host};
use crate::models::UserConfig;
use crate::services::deploy::{InstallLocations, ModDeploymentPipeline};
use crate::services::notify::NotificationService;
use crate::state::BuildRequestRegistry;
use camino::Utf8PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Resolved outcome of one correlated build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    pub succeeded: bool,
    pub display_name: String,
}

/// Listens for the host's build-finished signal and drives the completion
/// pipeline.
pub struct BuildCompletionCorrelator<H: Host> {
    coordinator: Coordinator<H>,
    registry: Arc<BuildRequestRegistry>,
    settings: SettingsManager,
    notifier: Arc<NotificationService<H>>,
    deployer: Arc<ModDeploymentPipeline>,
    subscribed: AtomicBool,
}

impl<H: Host> BuildCompletionCorrelator<H> {
    pub fn new(
        coordinator: Coordinator<H>,
        registry: Arc<BuildRequestRegistry>,
        settings: SettingsManager,
        notifier: Arc<NotificationService<H>>,
        deployer: Arc<ModDeploymentPipeline>,
    ) -> Arc<Self> {
        Arc::new(Self {
            coordinator,
            registry,
            settings,
            notifier,
            deployer,
            subscribed: AtomicBool::new(false),
        })
    }

    /// Start consuming build-finished events on a background task.
    ///
    /// At most one subscription per correlator; repeated calls return `false`
    /// and leave the existing listener running. The listener survives lagged
    /// receivers and exits when the host drops the sender.
    pub fn subscribe(self: Arc<Self>, mut events: broadcast::Receiver<BuildFinished>) -> bool {
        if self.subscribed.swap(true, Ordering::SeqCst) {
            tracing::debug!("build completion listener already running");
            return false;
        }

        let correlator = self;
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => correlator.handle_completion(event).await,
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::warn!("build completion listener lagged, {missed} events missed");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::debug!("build event channel closed, listener exiting");
                        break;
                    }
                }
            }
        });

        true
    }

    async fn handle_completion(&self, event: BuildFinished) {
        tracing::debug!(?event, "build finished signal received");

        let succeeded = match self
            .coordinator
            .call(|host| host.solution().last_build_succeeded())
            .await
        {
            Ok(succeeded) => succeeded,
            Err(e) => {
                tracing::warn!("could not read build outcome from the solution: {e}");
                return;
            }
        };

        let Some(request) = self.registry.take_oldest() else {
            tracing::debug!("completion signal with no pending request, ignoring");
            return;
        };

        let outcome = BuildOutcome {
            succeeded,
            display_name: request.display_name,
        };
        tracing::info!(
            "'{}' finished: {}",
            outcome.display_name,
            if outcome.succeeded { "success" } else { "failure" }
        );

        // Settings are read fresh at completion time so option changes made
        // while a build was running take effect.
        let config = match self.settings.load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("loading settings at build completion failed, using defaults: {e:#}");
                UserConfig::default()
            }
        };

        self.spawn_notification(&outcome, &config);

        if outcome.succeeded {
            self.spawn_deployment(&outcome, &config).await;
        }
    }

    fn spawn_notification(&self, outcome: &BuildOutcome, config: &UserConfig) {
        let notifier = Arc::clone(&self.notifier);
        let display_name = outcome.display_name.clone();
        let succeeded = outcome.succeeded;
        let duration = config.settings.notification_duration();
        let toast_enabled = config.settings.enable_toast_notifications;

        tokio::spawn(async move {
            notifier
                .notify(&display_name, succeeded, duration, toast_enabled)
                .await;
        });
    }

    async fn spawn_deployment(&self, outcome: &BuildOutcome, config: &UserConfig) {
        let solution_dir = match self
            .coordinator
            .call(|host| host.solution().full_path())
            .await
        {
            Ok(Some(path)) => path.parent().map(Utf8PathBuf::from),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("could not read solution path for deployment: {e}");
                None
            }
        };

        let Some(solution_dir) = solution_dir else {
            tracing::warn!("no solution directory available, skipping deployment");
            return;
        };

        let deployer = Arc::clone(&self.deployer);
        let build_name = outcome.display_name.clone();
        let mods: Vec<String> = config
            .settings
            .enabled_mods()
            .into_iter()
            .map(|m| m.name)
            .collect();
        let installs = InstallLocations::from_settings(&config.settings);

        tokio::spawn(async move {
            deployer.deploy(solution_dir, build_name, mods, installs).await;
        });
    }
}
