//! QuickBuild: build, launch, and deployment automation for the Satisfactory
//! modding solution, hosted inside an IDE extension.
//!
//! The extension shell owns the host object graph and the toolbar; this
//! crate owns everything behind the buttons: resolving and dispatching
//! builds, correlating completion signals, notifying outcomes, deploying mod
//! binaries into game installs, and launching the editor, script, and game.
//!
//! The entry point is [`controller::QuickBuildController`], driven through a
//! [`host::coordinator::Coordinator`] that serializes all access to the
//! thread-affine host objects.

pub mod config;
pub mod controller;
pub mod host;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;

pub use config::SettingsManager;
pub use controller::QuickBuildController;
pub use host::coordinator::Coordinator;
pub use models::{ModDescriptor, Settings, UserConfig};
pub use state::{BuildRequestRegistry, PendingBuildRequest};

/// Application version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const APP_NAME: &str = "QuickBuild";
