use serde::{Deserialize, Serialize};
use std::time::Duration;

/// User configuration from `QuickBuild Settings.yaml`.
///
/// This is the persisted options store the host exposes to the user:
/// notification behavior, per-channel game install locations, the external
/// launch script, and the mod list with enable flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(rename = "QuickBuild_Settings")]
    pub settings: Settings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "Enable Toast Notifications", default = "default_true")]
    pub enable_toast_notifications: bool,

    #[serde(
        rename = "Notification Duration Seconds",
        default = "default_notification_duration"
    )]
    pub notification_duration_seconds: u32,

    /// Delay between activating a configuration and issuing the build, in
    /// milliseconds. The host needs time to apply the activation; the exact
    /// race this papers over is undocumented upstream, so the value stays
    /// tunable instead of hard-wired.
    #[serde(rename = "Settle Delay Ms", default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    #[serde(rename = "Steam Install Location", default)]
    pub steam_install_location: String,

    #[serde(rename = "Epic Install Location", default)]
    pub epic_install_location: String,

    #[serde(rename = "Server Windows Install Location", default)]
    pub server_install_location: String,

    #[serde(rename = "Launch Script Path", default)]
    pub launch_script_path: String,

    #[serde(rename = "Mods", default)]
    pub mods: Vec<ModDescriptor>,
}

/// One mod known to the options store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModDescriptor {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Enabled", default)]
    pub enabled: bool,
}

impl Settings {
    /// Notification display time, clamped to 1-60 seconds.
    pub fn notification_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.notification_duration_seconds.clamp(1, 60)))
    }

    /// Settle delay applied after configuration activation.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// The enabled subset of the mod list.
    pub fn enabled_mods(&self) -> Vec<ModDescriptor> {
        self.mods.iter().filter(|m| m.enabled).cloned().collect()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable_toast_notifications: true,
            notification_duration_seconds: default_notification_duration(),
            settle_delay_ms: default_settle_delay_ms(),
            steam_install_location: String::new(),
            epic_install_location: String::new(),
            server_install_location: String::new(),
            launch_script_path: String::new(),
            mods: Vec::new(),
        }
    }
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_notification_duration() -> u32 {
    5
}

fn default_settle_delay_ms() -> u64 {
    500
}
