//! Session lifecycle configuration.

use serde::{Deserialize, Serialize};

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Absolute session lifetime in hours.
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,
    /// Idle timeout in minutes; sessions with no activity past this are terminated.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_minutes: u64,
    /// Interval between cleanup sweeps in seconds.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,
    /// Terminated/expired rows older than this many hours are deleted by cleanup.
    #[serde(default = "default_retention_hours")]
    pub retention_hours: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_ttl_hours(),
            idle_timeout_minutes: default_idle_timeout(),
            cleanup_interval_seconds: default_cleanup_interval(),
            retention_hours: default_retention_hours(),
        }
    }
}

fn default_ttl_hours() -> u64 {
    24
}

fn default_idle_timeout() -> u64 {
    120
}

fn default_cleanup_interval() -> u64 {
    300
}

fn default_retention_hours() -> u64 {
    72
}
