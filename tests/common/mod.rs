// In-memory fake host for integration tests.
//
// Every fake is Clone with Arc-shared interiors: the test keeps one clone
// for inspection and moves another into the coordinator's factory, so state
// recorded on the coordination thread is visible to assertions afterwards.

#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use quickbuild::host::{
    AlertSink, BuildEngine, BuildFinished, BuildOperation, Host, HostError, NativeHandle,
    ProcessLauncher, ProjectContext, ProjectKind, ProjectNode, Solution, SolutionConfig,
    SolutionService, StatusBar, ToastPresenter, ToastSeverity, TreeItem,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct FakeProject {
    pub name: String,
    pub unique_name: String,
    pub kind: ProjectKind,
    pub children: Vec<FakeProject>,
    pub handle: Option<NativeHandle>,
    pub guid: Option<String>,
}

impl FakeProject {
    pub fn project(name: &str, unique_name: &str) -> Self {
        Self {
            name: name.to_string(),
            unique_name: unique_name.to_string(),
            kind: ProjectKind::Project,
            children: Vec::new(),
            handle: None,
            guid: None,
        }
    }

    pub fn solution_folder(name: &str, children: Vec<FakeProject>) -> Self {
        Self {
            name: name.to_string(),
            unique_name: name.to_string(),
            kind: ProjectKind::SolutionFolder,
            children,
            handle: None,
            guid: None,
        }
    }

    pub fn folder(name: &str, children: Vec<FakeProject>) -> Self {
        Self {
            name: name.to_string(),
            unique_name: name.to_string(),
            kind: ProjectKind::Folder,
            children,
            handle: None,
            guid: None,
        }
    }

    pub fn item(name: &str) -> Self {
        Self {
            name: name.to_string(),
            unique_name: name.to_string(),
            kind: ProjectKind::Item,
            children: Vec::new(),
            handle: None,
            guid: None,
        }
    }

    pub fn with_handle(mut self, handle: NativeHandle) -> Self {
        self.handle = Some(handle);
        self
    }

    pub fn with_children(mut self, children: Vec<FakeProject>) -> Self {
        self.children = children;
        self
    }
}

impl ProjectNode for FakeProject {
    fn name(&self) -> &str {
        &self.name
    }

    fn unique_name(&self) -> &str {
        &self.unique_name
    }

    fn kind(&self) -> ProjectKind {
        self.kind
    }

    fn children(&self) -> Vec<&dyn ProjectNode> {
        self.children.iter().map(|c| c as &dyn ProjectNode).collect()
    }

    fn native_handle(&self) -> Result<Option<NativeHandle>, HostError> {
        Ok(self.handle)
    }

    fn property(&self, name: &str) -> Result<Option<String>, HostError> {
        if name == "ProjectGuid" {
            Ok(self.guid.clone())
        } else {
            Ok(None)
        }
    }
}

#[derive(Clone)]
pub struct FakeConfig {
    pub name: String,
    pub contexts: Vec<ProjectContext>,
    pub activations: Arc<AtomicUsize>,
}

impl FakeConfig {
    pub fn new(name: &str, contexts: &[(&str, &str)]) -> Self {
        Self {
            name: name.to_string(),
            contexts: contexts
                .iter()
                .map(|(project, platform)| ProjectContext {
                    project_name: project.to_string(),
                    platform_name: platform.to_string(),
                })
                .collect(),
            activations: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn activation_count(&self) -> usize {
        self.activations.load(Ordering::SeqCst)
    }
}

impl SolutionConfig for FakeConfig {
    fn name(&self) -> &str {
        &self.name
    }

    fn contexts(&self) -> Vec<ProjectContext> {
        self.contexts.clone()
    }

    fn activate(&self) -> Result<(), HostError> {
        self.activations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Clone)]
pub struct FakeSolution {
    pub open: bool,
    pub path: Option<Utf8PathBuf>,
    pub projects: Arc<Vec<FakeProject>>,
    pub configs: Arc<Vec<FakeConfig>>,
    pub last_build_succeeded: Arc<AtomicBool>,
}

impl FakeSolution {
    pub fn closed() -> Self {
        Self {
            open: false,
            path: None,
            projects: Arc::new(Vec::new()),
            configs: Arc::new(Vec::new()),
            last_build_succeeded: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn open(path: &str, projects: Vec<FakeProject>, configs: Vec<FakeConfig>) -> Self {
        Self {
            open: true,
            path: Some(Utf8PathBuf::from(path)),
            projects: Arc::new(projects),
            configs: Arc::new(configs),
            last_build_succeeded: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn set_build_outcome(&self, succeeded: bool) {
        self.last_build_succeeded.store(succeeded, Ordering::SeqCst);
    }
}

impl Solution for FakeSolution {
    fn is_open(&self) -> bool {
        self.open
    }

    fn full_path(&self) -> Option<Utf8PathBuf> {
        self.path.clone()
    }

    fn projects(&self) -> Vec<&dyn ProjectNode> {
        self.projects.iter().map(|p| p as &dyn ProjectNode).collect()
    }

    fn configurations(&self) -> Vec<&dyn SolutionConfig> {
        self.configs.iter().map(|c| c as &dyn SolutionConfig).collect()
    }

    fn last_build_succeeded(&self) -> bool {
        self.last_build_succeeded.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Default)]
pub struct FakeSolutionService {
    pub by_guid: HashMap<String, NativeHandle>,
    pub by_unique_name: HashMap<String, NativeHandle>,
}

impl SolutionService for FakeSolutionService {
    fn project_of_guid(&self, guid: &str) -> Result<Option<NativeHandle>, HostError> {
        Ok(self.by_guid.get(guid).copied())
    }

    fn project_of_unique_name(&self, unique_name: &str) -> Result<Option<NativeHandle>, HostError> {
        Ok(self.by_unique_name.get(unique_name).copied())
    }

    fn project_of_projref(&self, _projref: &str) -> Result<Option<NativeHandle>, HostError> {
        Ok(None)
    }
}

#[derive(Clone, Default)]
pub struct FakeBuildEngine {
    pub builds: Arc<Mutex<Vec<(Vec<NativeHandle>, BuildOperation)>>>,
    pub commands: Arc<Mutex<Vec<String>>>,
    pub fail_native: bool,
}

impl FakeBuildEngine {
    pub fn builds(&self) -> Vec<(Vec<NativeHandle>, BuildOperation)> {
        self.builds.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

impl BuildEngine for FakeBuildEngine {
    fn start_build(
        &self,
        handles: &[NativeHandle],
        operation: BuildOperation,
    ) -> Result<(), HostError> {
        if self.fail_native {
            return Err(HostError::new("native build rejected"));
        }
        self.builds.lock().unwrap().push((handles.to_vec(), operation));
        Ok(())
    }

    fn execute_command(&self, command: &str) -> Result<(), HostError> {
        self.commands.lock().unwrap().push(command.to_string());
        Ok(())
    }
}

#[derive(Clone)]
pub struct FakeTreeItem {
    pub unique_name: Option<String>,
    pub children: Vec<FakeTreeItem>,
    pub selections: Arc<Mutex<Vec<String>>>,
}

impl FakeTreeItem {
    pub fn root(children: Vec<FakeTreeItem>) -> Self {
        let selections = Arc::new(Mutex::new(Vec::new()));
        let children = children
            .into_iter()
            .map(|mut c| {
                c.share_log(&selections);
                c
            })
            .collect();
        Self {
            unique_name: None,
            children,
            selections,
        }
    }

    pub fn item(unique_name: &str) -> Self {
        Self {
            unique_name: Some(unique_name.to_string()),
            children: Vec::new(),
            selections: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn group(children: Vec<FakeTreeItem>) -> Self {
        Self {
            unique_name: None,
            children,
            selections: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn selections(&self) -> Vec<String> {
        self.selections.lock().unwrap().clone()
    }

    fn share_log(&mut self, log: &Arc<Mutex<Vec<String>>>) {
        self.selections = Arc::clone(log);
        for child in &mut self.children {
            child.share_log(log);
        }
    }
}

impl TreeItem for FakeTreeItem {
    fn project_unique_name(&self) -> Option<String> {
        self.unique_name.clone()
    }

    fn children(&self) -> Vec<&dyn TreeItem> {
        self.children.iter().map(|c| c as &dyn TreeItem).collect()
    }

    fn select(&self) -> Result<(), HostError> {
        if let Some(unique_name) = &self.unique_name {
            self.selections.lock().unwrap().push(unique_name.clone());
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct FakeStatusBar {
    pub history: Arc<Mutex<Vec<String>>>,
    pub clears: Arc<AtomicUsize>,
}

impl FakeStatusBar {
    pub fn history(&self) -> Vec<String> {
        self.history.lock().unwrap().clone()
    }

    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl StatusBar for FakeStatusBar {
    fn set_text(&self, text: &str) -> Result<(), HostError> {
        self.history.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), HostError> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct FakeAlerts {
    pub shown: Arc<Mutex<Vec<(String, String)>>>,
}

impl FakeAlerts {
    pub fn shown(&self) -> Vec<(String, String)> {
        self.shown.lock().unwrap().clone()
    }
}

impl AlertSink for FakeAlerts {
    fn error(&self, caption: &str, message: &str) {
        self.shown
            .lock()
            .unwrap()
            .push((caption.to_string(), message.to_string()));
    }
}

#[derive(Clone, Default)]
pub struct FakeLauncher {
    pub launched: Arc<Mutex<Vec<(Utf8PathBuf, Option<Utf8PathBuf>)>>>,
}

impl FakeLauncher {
    pub fn launched(&self) -> Vec<(Utf8PathBuf, Option<Utf8PathBuf>)> {
        self.launched.lock().unwrap().clone()
    }
}

impl ProcessLauncher for FakeLauncher {
    fn launch(&self, path: &Utf8Path, working_dir: Option<&Utf8Path>) -> Result<(), HostError> {
        self.launched
            .lock()
            .unwrap()
            .push((path.to_path_buf(), working_dir.map(Utf8Path::to_path_buf)));
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct FakeToasts {
    pub shown: Arc<Mutex<Vec<(String, ToastSeverity)>>>,
}

impl FakeToasts {
    pub fn shown(&self) -> Vec<(String, ToastSeverity)> {
        self.shown.lock().unwrap().clone()
    }
}

impl ToastPresenter for FakeToasts {
    fn show(
        &self,
        message: &str,
        severity: ToastSeverity,
        _duration: Duration,
    ) -> Result<(), HostError> {
        self.shown
            .lock()
            .unwrap()
            .push((message.to_string(), severity));
        Ok(())
    }
}

#[derive(Clone)]
pub struct FakeHost {
    pub solution: FakeSolution,
    pub solution_service: FakeSolutionService,
    pub build_engine: FakeBuildEngine,
    pub status_bar: FakeStatusBar,
    pub tree: FakeTreeItem,
    pub launcher: FakeLauncher,
    pub alerts: FakeAlerts,
    pub events: broadcast::Sender<BuildFinished>,
}

impl FakeHost {
    pub fn new(solution: FakeSolution) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            solution,
            solution_service: FakeSolutionService::default(),
            build_engine: FakeBuildEngine::default(),
            status_bar: FakeStatusBar::default(),
            tree: FakeTreeItem::root(Vec::new()),
            launcher: FakeLauncher::default(),
            alerts: FakeAlerts::default(),
            events,
        }
    }

    pub fn with_tree(mut self, tree: FakeTreeItem) -> Self {
        self.tree = tree;
        self
    }

    /// Fire the build-finished signal the way the host does after any build.
    pub fn signal_build_finished(&self, event: BuildFinished) {
        // No receiver just means nobody subscribed yet.
        let _ = self.events.send(event);
    }
}

impl Host for FakeHost {
    fn solution(&self) -> &dyn Solution {
        &self.solution
    }

    fn solution_service(&self) -> &dyn SolutionService {
        &self.solution_service
    }

    fn build_engine(&self) -> &dyn BuildEngine {
        &self.build_engine
    }

    fn status_bar(&self) -> &dyn StatusBar {
        &self.status_bar
    }

    fn project_tree(&self) -> &dyn TreeItem {
        &self.tree
    }

    fn launcher(&self) -> &dyn ProcessLauncher {
        &self.launcher
    }

    fn alerts(&self) -> &dyn AlertSink {
        &self.alerts
    }

    fn build_events(&self) -> broadcast::Receiver<BuildFinished> {
        self.events.subscribe()
    }
}

/// A FactoryGame-shaped solution: the game project (with a native handle),
/// a Mods solution folder, and the editor configuration.
pub fn factory_game_host() -> FakeHost {
    let projects = vec![
        FakeProject::solution_folder(
            "Games",
            vec![FakeProject::project("FactoryGame", "Games/FactoryGame.vcxproj")
                .with_handle(NativeHandle(11))],
        ),
        FakeProject::project("UE5", "Engine/UE5.vcxproj"),
    ];
    let configs = vec![
        FakeConfig::new(
            "Development Editor|Win64",
            &[("Games/FactoryGame.vcxproj", "Win64")],
        ),
        FakeConfig::new("Shipping|Win64", &[("Games/FactoryGame.vcxproj", "Win64")]),
    ];

    FakeHost::new(FakeSolution::open(
        "C:/SatisfactoryModLoader/FactoryGame.sln",
        projects,
        configs,
    ))
    .with_tree(FakeTreeItem::root(vec![FakeTreeItem::group(vec![
        FakeTreeItem::item("Games/FactoryGame.vcxproj"),
        FakeTreeItem::item("Engine/UE5.vcxproj"),
    ])]))
}
