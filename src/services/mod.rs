//! Automation services.
//!
//! [`dispatch`] resolves and triggers builds, [`correlate`] pairs the host's
//! completion signals with pending requests, [`notify`] and [`deploy`] run
//! the post-build pipeline, and [`launch`] starts external processes.
//! [`resolve`] and [`handles`] are the shared lookup primitives underneath
//! dispatch.

pub mod correlate;
pub mod deploy;
pub mod dispatch;
pub mod handles;
pub mod launch;
pub mod notify;
pub mod resolve;

pub use correlate::{BuildCompletionCorrelator, BuildOutcome};
pub use deploy::{DeployChannel, DeploySummary, InstallLocations, ModDeploymentPipeline};
pub use dispatch::{BuildDispatcher, DispatchError};
pub use launch::{LaunchError, LaunchService};
pub use notify::NotificationService;
