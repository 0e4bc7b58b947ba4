//! Configuration types for Pickems.
//!
//! `PickemsConfig` represents the `pickems.toml` file that controls where
//! tenant documents live and how a new tenant is provisioned.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration. All fields have defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PickemsConfig {
    /// Root directory for tenant documents. Defaults to `./data`.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[serde(default)]
    pub enable_otel: bool,

    /// Names used when bootstrapping a tenant.
    #[serde(default)]
    pub provisioning: ProvisioningConfig,
}

/// Role, category, and channel names created by tenant bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisioningConfig {
    pub admin_role: String,
    pub category: String,
    pub console_channel: String,
    pub matchups_channel: String,
    pub leaderboard_channel: String,
    pub settings_channel: String,
    pub matchup_category: String,
    pub archive_category: String,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            admin_role: "Pick'em Admin".to_string(),
            category: "pickems".to_string(),
            console_channel: "pickems-console".to_string(),
            matchups_channel: "matchups".to_string(),
            leaderboard_channel: "leaderboard".to_string(),
            settings_channel: "settings".to_string(),
            matchup_category: "pickems-matchups".to_string(),
            archive_category: "pickems-matchups-archive".to_string(),
        }
    }
}
