//! Discord adapter over serenity's HTTP client.
//!
//! Only REST calls are made; no gateway connection is opened. Stored ids are
//! decimal snowflake strings and are parsed here.

use std::sync::Arc;

use pickems_core::service::platform::ChatPlatform;
use pickems_types::error::PlatformError;
use pickems_types::platform::{ChannelId, ChannelKind, ChannelSpec, ChannelVisibility, MessageId, RoleId};
use pickems_types::tenant::TenantId;
use serenity::all::{
    ChannelType, CreateChannel, CreateMessage, EditMessage, EditRole, GetMessages, PermissionOverwrite,
    PermissionOverwriteType, Permissions,
};
use serenity::http::{Http, HttpError};
use serenity::model::id;

/// Discord JSON error code for an unknown channel.
const UNKNOWN_CHANNEL: isize = 10003;

/// [`ChatPlatform`] backed by the Discord REST API.
#[derive(Clone)]
pub struct SerenityPlatform {
    http: Arc<Http>,
}

impl SerenityPlatform {
    /// Create an adapter authenticating with a bot token.
    pub fn new(token: &str) -> Self {
        Self {
            http: Arc::new(Http::new(token)),
        }
    }

    /// Wrap an existing client (e.g. one shared with a gateway connection).
    pub fn from_http(http: Arc<Http>) -> Self {
        Self { http }
    }
}

fn snowflake(raw: &str) -> Result<u64, PlatformError> {
    raw.parse::<u64>()
        .ok()
        .filter(|n| *n != 0)
        .ok_or_else(|| PlatformError::InvalidId(raw.to_string()))
}

fn guild_id(tenant: &TenantId) -> Result<id::GuildId, PlatformError> {
    snowflake(tenant.as_str()).map(id::GuildId::new)
}

fn channel_id(channel: &ChannelId) -> Result<id::ChannelId, PlatformError> {
    snowflake(channel.as_str()).map(id::ChannelId::new)
}

fn message_id(message: &MessageId) -> Result<id::MessageId, PlatformError> {
    snowflake(message.as_str()).map(id::MessageId::new)
}

fn role_id(role: &RoleId) -> Result<id::RoleId, PlatformError> {
    snowflake(role.as_str()).map(id::RoleId::new)
}

/// Permission overwrites for a visibility. The `@everyone` role shares the
/// guild's id.
fn overwrites(
    guild: id::GuildId,
    visibility: &ChannelVisibility,
) -> Result<Vec<PermissionOverwrite>, PlatformError> {
    let everyone = PermissionOverwriteType::Role(id::RoleId::new(guild.get()));
    let overwrites = match visibility {
        ChannelVisibility::Inherit => Vec::new(),
        ChannelVisibility::Private { role } => vec![
            PermissionOverwrite {
                allow: Permissions::empty(),
                deny: Permissions::VIEW_CHANNEL,
                kind: everyone,
            },
            PermissionOverwrite {
                allow: Permissions::VIEW_CHANNEL,
                deny: Permissions::empty(),
                kind: PermissionOverwriteType::Role(role_id(role)?),
            },
        ],
        ChannelVisibility::ReadOnly => vec![PermissionOverwrite {
            allow: Permissions::VIEW_CHANNEL,
            deny: Permissions::SEND_MESSAGES,
            kind: everyone,
        }],
    };
    Ok(overwrites)
}

/// Map a serenity error, naming `target` for unknown-channel failures.
fn map_error(err: serenity::Error, target: &str) -> PlatformError {
    if let serenity::Error::Http(http_err) = &err {
        let http_err: &HttpError = http_err;
        if let HttpError::UnsuccessfulRequest(response) = http_err {
            let status = response.status_code.as_u16();
            if status == 404 || response.error.code == UNKNOWN_CHANNEL {
                return PlatformError::UnknownChannel(target.to_string());
            }
            if status == 403 {
                return PlatformError::Forbidden(response.error.message.clone());
            }
        }
    }
    PlatformError::Request(err.to_string())
}

impl ChatPlatform for SerenityPlatform {
    async fn create_role(&self, tenant: &TenantId, name: &str) -> Result<RoleId, PlatformError> {
        let guild = guild_id(tenant)?;
        let role = guild
            .create_role(&*self.http, EditRole::new().name(name))
            .await
            .map_err(|e| map_error(e, tenant.as_str()))?;
        tracing::debug!(%tenant, role = %role.id, name, "Created role");
        Ok(RoleId::new(role.id.to_string()))
    }

    async fn create_channel(&self, tenant: &TenantId, spec: &ChannelSpec) -> Result<ChannelId, PlatformError> {
        let guild = guild_id(tenant)?;
        let kind = match spec.kind {
            ChannelKind::Category => ChannelType::Category,
            ChannelKind::Text => ChannelType::Text,
        };

        let mut builder = CreateChannel::new(spec.name.as_str())
            .kind(kind)
            .permissions(overwrites(guild, &spec.visibility)?);
        if let Some(parent) = &spec.parent {
            builder = builder.category(channel_id(parent)?);
        }

        let channel = guild
            .create_channel(&*self.http, builder)
            .await
            .map_err(|e| map_error(e, tenant.as_str()))?;
        Ok(ChannelId::new(channel.id.to_string()))
    }

    async fn latest_message(&self, channel: &ChannelId) -> Result<Option<MessageId>, PlatformError> {
        let messages = channel_id(channel)?
            .messages(&*self.http, GetMessages::new().limit(1))
            .await
            .map_err(|e| map_error(e, channel.as_str()))?;
        Ok(messages.first().map(|m| MessageId::new(m.id.to_string())))
    }

    async fn send_message(&self, channel: &ChannelId, content: &str) -> Result<MessageId, PlatformError> {
        let message = channel_id(channel)?
            .send_message(&*self.http, CreateMessage::new().content(content))
            .await
            .map_err(|e| map_error(e, channel.as_str()))?;
        Ok(MessageId::new(message.id.to_string()))
    }

    async fn edit_message(
        &self,
        channel: &ChannelId,
        message: &MessageId,
        content: &str,
    ) -> Result<(), PlatformError> {
        channel_id(channel)?
            .edit_message(&*self.http, message_id(message)?, EditMessage::new().content(content))
            .await
            .map_err(|e| map_error(e, channel.as_str()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snowflake_parsing() {
        assert_eq!(snowflake("1100").unwrap(), 1100);
        assert_eq!(snowflake("0"), Err(PlatformError::InvalidId("0".to_string())));
        assert_eq!(snowflake("abc"), Err(PlatformError::InvalidId("abc".to_string())));
        assert!(channel_id(&ChannelId::new("-5")).is_err());
    }

    #[test]
    fn test_tenant_must_be_a_snowflake() {
        let tenant = TenantId::parse("dev-guild").unwrap();
        assert!(matches!(guild_id(&tenant), Err(PlatformError::InvalidId(_))));
    }

    #[test]
    fn test_private_overwrites() {
        let guild = id::GuildId::new(42);
        let visibility = ChannelVisibility::Private {
            role: RoleId::new("7"),
        };
        let overwrites = overwrites(guild, &visibility).unwrap();
        assert_eq!(overwrites.len(), 2);
        assert_eq!(overwrites[0].kind, PermissionOverwriteType::Role(id::RoleId::new(42)));
        assert_eq!(overwrites[0].deny, Permissions::VIEW_CHANNEL);
        assert_eq!(overwrites[1].kind, PermissionOverwriteType::Role(id::RoleId::new(7)));
        assert_eq!(overwrites[1].allow, Permissions::VIEW_CHANNEL);
    }

    #[test]
    fn test_read_only_overwrites() {
        let overwrites = overwrites(id::GuildId::new(42), &ChannelVisibility::ReadOnly).unwrap();
        assert_eq!(overwrites.len(), 1);
        assert_eq!(overwrites[0].allow, Permissions::VIEW_CHANNEL);
        assert_eq!(overwrites[0].deny, Permissions::SEND_MESSAGES);
        assert!(super::overwrites(id::GuildId::new(42), &ChannelVisibility::Inherit)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_non_http_errors_are_requests() {
        let err = map_error(serenity::Error::Other("boom"), "555");
        assert!(matches!(err, PlatformError::Request(ref m) if m.contains("boom")));
    }
}
