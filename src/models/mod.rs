// Data models for the persisted settings store.

pub mod config;

pub use config::{ModDescriptor, Settings, UserConfig};
