//! The per-tenant settings record.
//!
//! Written once by tenant bootstrap, then read by the command layer to find
//! its channels. Fields the store does not know about are carried through
//! untouched in [`Settings::extra`].

use serde::{Deserialize, Serialize};

use crate::platform::{ChannelId, RoleId};
use crate::tenant::TenantId;

/// Tenant settings, stored as `settings.json`.
///
/// Every field is optional so an empty record (`{}`) is valid settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Week records, in order. Opaque to the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weeks: Option<Vec<serde_json::Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<TenantId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matchups_channel_id: Option<ChannelId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaderboard_channel_id: Option<ChannelId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub console_channel_id: Option<ChannelId>,

    /// Channel the settings mirror is published to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings_channel_id: Option<ChannelId>,

    /// Category holding active matchup channels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickems_matchup_category_id: Option<ChannelId>,

    /// Category holding archived matchup channels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickems_matchup_archive_category_id: Option<ChannelId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_role_id: Option<RoleId>,

    /// Unknown fields, in document order.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Settings {
    /// Whether external resources were already provisioned for the tenant.
    pub fn is_bootstrapped(&self) -> bool {
        self.guild_id.is_some() || self.settings_channel_id.is_some()
    }
}
