//! Settings mirror.
//!
//! Keeps a human-readable copy of a tenant's settings as the single most
//! recent message in its settings channel. Publishing is best effort: every
//! failure is logged and reported in the outcome, never raised.

use pickems_types::platform::{ChannelId, MessageId};
use pickems_types::settings::Settings;
use pickems_types::tenant::TenantId;

use crate::service::entities::EntityService;
use crate::service::fs::FileSystem;
use crate::service::platform::ChatPlatform;

/// Result of one publish attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorOutcome {
    /// The channel was empty; a new message was sent.
    Sent(MessageId),
    /// The latest message in the channel was edited in place.
    Edited(MessageId),
    /// No settings channel is configured for the tenant.
    Skipped,
    /// The platform or the settings read failed.
    Failed(String),
}

/// Message body for a settings snapshot: the 2-space pretty JSON inside a
/// code fence.
pub fn format_settings_message(settings: &Settings) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string_pretty(settings)?;
    Ok(format!("```{json}```"))
}

/// Publishes settings snapshots through a [`ChatPlatform`].
pub struct SettingsMirror<P: ChatPlatform> {
    platform: P,
}

impl<P: ChatPlatform> SettingsMirror<P> {
    pub fn new(platform: P) -> Self {
        Self { platform }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Upsert the settings message for `tenant`.
    ///
    /// The target channel comes from the *stored* settings, not from
    /// `settings`, so a snapshot can be published right after it is saved.
    pub async fn publish_settings<F: FileSystem>(
        &self,
        entities: &EntityService<F>,
        tenant: &TenantId,
        settings: &Settings,
    ) -> MirrorOutcome {
        let channel = match entities.settings_channel_id(tenant).await {
            Ok(Some(channel)) => channel,
            Ok(None) => {
                tracing::debug!(%tenant, "No settings channel configured, skipping mirror");
                return MirrorOutcome::Skipped;
            }
            Err(e) => {
                tracing::warn!(%tenant, error = %e, "Could not resolve settings channel");
                return MirrorOutcome::Failed(e.to_string());
            }
        };

        let body = match format_settings_message(settings) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(%tenant, error = %e, "Could not render settings mirror");
                return MirrorOutcome::Failed(e.to_string());
            }
        };
        match self.upsert(&channel, &body).await {
            Ok(outcome) => {
                tracing::info!(%tenant, %channel, ?outcome, "Published settings mirror");
                outcome
            }
            Err(e) => {
                tracing::warn!(%tenant, %channel, error = %e, "Failed to publish settings mirror");
                MirrorOutcome::Failed(e.to_string())
            }
        }
    }

    async fn upsert(
        &self,
        channel: &ChannelId,
        body: &str,
    ) -> Result<MirrorOutcome, pickems_types::error::PlatformError> {
        match self.platform.latest_message(channel).await? {
            Some(message) => {
                self.platform.edit_message(channel, &message, body).await?;
                Ok(MirrorOutcome::Edited(message))
            }
            None => {
                let message = self.platform.send_message(channel, body).await?;
                Ok(MirrorOutcome::Sent(message))
            }
        }
    }
}
