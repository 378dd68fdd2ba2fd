//! Host IDE interface surface.
//!
//! Everything the automation core needs from the host environment is behind
//! the traits in this module: the live project/solution object model, the
//! build engine, the solution service for native-handle lookups, the status
//! bar and alert widgets, the UI project tree, and the OS process launcher.
//!
//! The production implementations live in the host extension shell; the
//! integration tests provide in-memory fakes. All of these objects are
//! assumed to be affine to a single host thread and are only ever touched
//! from the [`Coordinator`](coordinator::Coordinator).

pub mod coordinator;

use camino::{Utf8Path, Utf8PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast;

/// A failed call into the host environment.
///
/// Host failures inside fallback chains are swallowed and logged; only the
/// top-level dispatch/launch paths surface them to the user.
#[derive(Debug, Clone, Error)]
#[error("host call failed: {0}")]
pub struct HostError(pub String);

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// The build engine's opaque reference to a single project.
///
/// Required to target a build at exactly one project; obtained through the
/// resolution chain in [`crate::services::handles`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(pub u64);

/// Kind of a node in the solution's project tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    /// A buildable project.
    Project,
    /// An organizational solution folder; never a build target itself.
    SolutionFolder,
    /// A folder item inside a project (e.g. the Mods directory).
    Folder,
    /// A leaf item inside a project.
    Item,
}

/// Borrowed view of one node in the host's live project tree.
///
/// Implementations expose sub-projects of solution folders and item children
/// of projects through the same [`children`](Self::children) accessor; the
/// walkers in [`crate::services::resolve`] decide which kinds to descend
/// into. No ownership of the underlying host object is ever taken.
pub trait ProjectNode {
    /// Simple display name of the node.
    fn name(&self) -> &str;

    /// Unique path of the node within the solution (e.g.
    /// `"Games/FactoryGame.vcxproj"`).
    fn unique_name(&self) -> &str;

    fn kind(&self) -> ProjectKind;

    /// Child nodes in host-given order.
    fn children(&self) -> Vec<&dyn ProjectNode>;

    /// Native build-engine handle, if the node directly exposes one.
    ///
    /// This is the first strategy of the handle resolution chain; hosts that
    /// cannot adapt the node report `Ok(None)`.
    fn native_handle(&self) -> Result<Option<NativeHandle>, HostError> {
        Ok(None)
    }

    /// Read a named project property (e.g. `"ProjectGuid"`).
    fn property(&self, _name: &str) -> Result<Option<String>, HostError> {
        Ok(None)
    }
}

/// Per-project context of a solution build configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectContext {
    /// Project file path as recorded by the configuration.
    pub project_name: String,
    /// Platform the context builds for (e.g. `"Win64"`, `"x64"`).
    pub platform_name: String,
}

/// One named (configuration, platform) pair owned by the host.
pub trait SolutionConfig {
    /// Composite display name, typically `"{configuration}|{platform}"`.
    fn name(&self) -> &str;

    /// Per-project build contexts of this configuration.
    fn contexts(&self) -> Vec<ProjectContext>;

    /// Make this configuration the active one. Mutating host call with no
    /// return value beyond failure.
    fn activate(&self) -> Result<(), HostError>;
}

/// The open solution, if any.
pub trait Solution {
    fn is_open(&self) -> bool;

    /// Full path of the solution file, when one is loaded.
    fn full_path(&self) -> Option<Utf8PathBuf>;

    /// Top-level project nodes in host-given order.
    fn projects(&self) -> Vec<&dyn ProjectNode>;

    /// All solution build configurations.
    fn configurations(&self) -> Vec<&dyn SolutionConfig>;

    /// Whether the most recent build finished with zero failing projects.
    fn last_build_succeeded(&self) -> bool;
}

/// Handle lookup service for projects the node itself cannot adapt.
pub trait SolutionService {
    fn project_of_guid(&self, guid: &str) -> Result<Option<NativeHandle>, HostError>;

    fn project_of_unique_name(&self, unique_name: &str) -> Result<Option<NativeHandle>, HostError>;

    /// Resolve from a generic project-reference encoding of the unique path.
    fn project_of_projref(&self, projref: &str) -> Result<Option<NativeHandle>, HostError>;
}

/// Operation requested from the build engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOperation {
    Build,
    Rebuild,
    Clean,
}

/// The host's build engine. Invoked, never reimplemented.
pub trait BuildEngine {
    /// Start a build restricted to exactly the given project handles.
    fn start_build(
        &self,
        handles: &[NativeHandle],
        operation: BuildOperation,
    ) -> Result<(), HostError>;

    /// Execute a generic named host command (e.g.
    /// `"Build.BuildOnlyProject"`).
    fn execute_command(&self, command: &str) -> Result<(), HostError>;
}

/// Selectable item in the host's project-tree UI view.
pub trait TreeItem {
    /// Unique name of the project this item represents, when it does.
    fn project_unique_name(&self) -> Option<String>;

    fn children(&self) -> Vec<&dyn TreeItem>;

    fn select(&self) -> Result<(), HostError>;
}

/// Status-bar text sink. Best-effort; failures are swallowed by callers.
pub trait StatusBar {
    fn set_text(&self, text: &str) -> Result<(), HostError>;

    fn clear(&self) -> Result<(), HostError>;
}

/// Blocking modal sink for user-facing precondition and critical errors.
pub trait AlertSink {
    fn error(&self, caption: &str, message: &str);
}

/// OS process launcher for external executables and scripts.
pub trait ProcessLauncher {
    fn launch(&self, path: &Utf8Path, working_dir: Option<&Utf8Path>) -> Result<(), HostError>;
}

/// Presentation style of a transient desktop notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastSeverity {
    /// Default presentation for successful outcomes.
    Info,
    /// Attention-grabbing presentation for failures.
    Alarm,
}

/// Transient desktop notification renderer.
///
/// Unlike the rest of the host surface, toast rendering is not affine to the
/// host thread; it runs on a background worker, hence the `Send + Sync`
/// bounds.
pub trait ToastPresenter: Send + Sync {
    fn show(
        &self,
        message: &str,
        severity: ToastSeverity,
        duration: Duration,
    ) -> Result<(), HostError>;
}

/// Scope of a completed build, as reported by the host signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildScope {
    Solution,
    Batch,
    Project,
}

/// Action of a completed build, as reported by the host signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildAction {
    Build,
    RebuildAll,
    Clean,
    Deploy,
}

/// Payload of the host's build-finished signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildFinished {
    pub scope: BuildScope,
    pub action: BuildAction,
}

/// Aggregate host surface owned by the coordination context.
pub trait Host: 'static {
    fn solution(&self) -> &dyn Solution;

    fn solution_service(&self) -> &dyn SolutionService;

    fn build_engine(&self) -> &dyn BuildEngine;

    fn status_bar(&self) -> &dyn StatusBar;

    /// Root of the project-tree UI view used for selection fallback.
    fn project_tree(&self) -> &dyn TreeItem;

    fn launcher(&self) -> &dyn ProcessLauncher;

    fn alerts(&self) -> &dyn AlertSink;

    /// Subscribe to the host's build-finished signal.
    ///
    /// The receiver is handed out once per subscriber and may be moved off
    /// the host thread; events fire after any build completes.
    fn build_events(&self) -> broadcast::Receiver<BuildFinished>;
}
