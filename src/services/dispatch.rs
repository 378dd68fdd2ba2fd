// Build dispatch orchestration.
//
// Resolves a logical (configuration, platform, project) request against the
// host's object model, registers the pending request, and triggers the
// build: natively when a build-engine handle can be resolved, otherwise by
// simulating the user's manual "select project + build" action in the UI
// tree. Native per-handle builds are precise and silent; the UI fallback is
// the only mechanism that works for project kinds the solution service
// cannot resolve.

use crate::host::coordinator::{ContextClosed, Coordinator};
use crate::host::{BuildOperation, Host, HostError, TreeItem};
use crate::services::{handles, resolve};
use crate::state::BuildRequestRegistry;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

/// Generic host command that builds the currently selected project.
pub const BUILD_ONLY_PROJECT_COMMAND: &str = "Build.BuildOnlyProject";

/// Dispatch failures. The `Display` text of the precondition variants is the
/// exact message shown to the user.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("No solution is currently open.")]
    NoSolution,

    #[error("Project '{0}' not found in the solution.")]
    ProjectNotFound(String),

    #[error(
        "Configuration '{config}' with platform '{platform}' not found in the solution. \
         Please ensure this configuration exists."
    )]
    ConfigurationNotFound { config: String, platform: String },

    #[error(transparent)]
    ContextClosed(#[from] ContextClosed),

    #[error(transparent)]
    Host(#[from] HostError),
}

/// Everything dispatch needs to carry across coordination-context hops.
///
/// Host objects cannot leave the coordination thread, so resolution extracts
/// owned tokens: the configuration's exact composite name (re-looked-up for
/// activation), the project's unique name (for UI selection), and the native
/// handle when one resolved.
struct Resolution {
    config_key: String,
    project_unique_name: String,
    handle: Option<crate::host::NativeHandle>,
}

/// Orchestrates project/configuration resolution and build triggering.
pub struct BuildDispatcher<H: Host> {
    coordinator: Coordinator<H>,
    registry: Arc<BuildRequestRegistry>,
    settle_delay: Duration,
}

impl<H: Host> BuildDispatcher<H> {
    pub fn new(
        coordinator: Coordinator<H>,
        registry: Arc<BuildRequestRegistry>,
        settle_delay: Duration,
    ) -> Self {
        Self {
            coordinator,
            registry,
            settle_delay,
        }
    }

    /// Resolve and trigger a build of `project_name` under `config_name` for
    /// `platform`, registering a pending request under `display_name`.
    ///
    /// The pending request is registered before the build is triggered, so
    /// the completion correlator always has an entry to consume when the
    /// host signals.
    pub async fn dispatch(
        &self,
        config_name: &str,
        platform: &str,
        project_name: &str,
        display_name: &str,
    ) -> Result<(), DispatchError> {
        let resolution = self
            .resolve(config_name, platform, project_name, display_name)
            .await?;

        if let Some(handle) = resolution.handle {
            self.activate_and_settle(&resolution.config_key).await?;

            let built = self
                .coordinator
                .call(move |host| {
                    host.build_engine()
                        .start_build(&[handle], BuildOperation::Build)
                })
                .await?;

            match built {
                Ok(()) => {
                    tracing::info!(
                        "native build started for '{}' ({})",
                        resolution.project_unique_name,
                        resolution.config_key
                    );
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("native build call failed, falling back to UI selection: {e}");
                }
            }
        } else {
            tracing::debug!(
                "no native handle for '{}', using UI selection fallback",
                resolution.project_unique_name
            );
        }

        self.activate_and_settle(&resolution.config_key).await?;

        let unique_name = resolution.project_unique_name;
        self.coordinator
            .call(move |host| {
                if !select_project_item(host.project_tree(), &unique_name) {
                    tracing::warn!("could not select '{unique_name}' in the project tree");
                }
                host.build_engine()
                    .execute_command(BUILD_ONLY_PROJECT_COMMAND)
            })
            .await??;

        Ok(())
    }

    /// Phase one, entirely on the coordination context: precondition checks,
    /// project and configuration resolution, request registration, handle
    /// chain.
    async fn resolve(
        &self,
        config_name: &str,
        platform: &str,
        project_name: &str,
        display_name: &str,
    ) -> Result<Resolution, DispatchError> {
        let registry = Arc::clone(&self.registry);
        let config_name = config_name.to_string();
        let platform = platform.to_string();
        let project_name = project_name.to_string();
        let display_name = display_name.to_string();

        self.coordinator
            .call(move |host| {
                let solution = host.solution();
                if !solution.is_open() {
                    return Err(DispatchError::NoSolution);
                }

                let projects = solution.projects();
                let project = resolve::find_project(&projects, &project_name)
                    .ok_or_else(|| DispatchError::ProjectNotFound(project_name.clone()))?;

                // Register before anything can trigger the build.
                registry.register(&project_name, &display_name);

                let project_file = resolve::file_name_of(project.unique_name()).to_string();

                let configurations = solution.configurations();
                let config =
                    resolve::find_configuration(&configurations, &config_name, &platform, &project_file)
                        .ok_or_else(|| DispatchError::ConfigurationNotFound {
                            config: config_name.clone(),
                            platform: platform.clone(),
                        })?;

                let handle = handles::resolve_handle(project, host.solution_service());

                Ok(Resolution {
                    config_key: config.name().to_string(),
                    project_unique_name: project.unique_name().to_string(),
                    handle,
                })
            })
            .await?
    }

    /// Activate the configuration, then give the host the settle delay to
    /// apply the activation before a build is issued.
    async fn activate_and_settle(&self, config_key: &str) -> Result<(), DispatchError> {
        let key = config_key.to_string();
        self.coordinator
            .call(move |host| {
                let configurations = host.solution().configurations();
                let config = configurations
                    .iter()
                    .find(|c| c.name() == key)
                    .ok_or_else(|| {
                        HostError::new(format!("configuration '{key}' disappeared during dispatch"))
                    })?;
                config.activate()
            })
            .await??;

        if !self.settle_delay.is_zero() {
            sleep(self.settle_delay).await;
        }

        Ok(())
    }
}

/// Select the tree item representing `unique_name`.
///
/// Iterative pre-order walk over the UI view; a node whose selection fails
/// is logged and skipped, and traversal continues in case another item
/// represents the same project.
fn select_project_item(root: &dyn TreeItem, unique_name: &str) -> bool {
    let mut stack: Vec<&dyn TreeItem> = vec![root];

    while let Some(item) = stack.pop() {
        if item.project_unique_name().as_deref() == Some(unique_name) {
            match item.select() {
                Ok(()) => return true,
                Err(e) => tracing::debug!("selecting '{unique_name}' failed: {e}"),
            }
        }

        for child in item.children().into_iter().rev() {
            stack.push(child);
        }
    }

    false
}
