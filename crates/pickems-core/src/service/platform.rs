//! ChatPlatform trait for the chat-platform collaborator.
//!
//! The store never talks to Discord directly. The mirror and bootstrap
//! services receive an implementation of this trait; the serenity-backed
//! adapter lives in pickems-infra.

use pickems_types::error::PlatformError;
use pickems_types::platform::{ChannelId, ChannelSpec, MessageId, RoleId};
use pickems_types::tenant::TenantId;

/// Capabilities the store needs from the chat platform.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition). Connection
/// management, rate limits, and retries are the implementation's concern.
pub trait ChatPlatform: Send + Sync {
    /// Create a role in the tenant.
    fn create_role(
        &self,
        tenant: &TenantId,
        name: &str,
    ) -> impl std::future::Future<Output = Result<RoleId, PlatformError>> + Send;

    /// Create a channel or category in the tenant.
    fn create_channel(
        &self,
        tenant: &TenantId,
        spec: &ChannelSpec,
    ) -> impl std::future::Future<Output = Result<ChannelId, PlatformError>> + Send;

    /// The most recently sent message in a channel, if any.
    fn latest_message(
        &self,
        channel: &ChannelId,
    ) -> impl std::future::Future<Output = Result<Option<MessageId>, PlatformError>> + Send;

    /// Send a new message.
    fn send_message(
        &self,
        channel: &ChannelId,
        content: &str,
    ) -> impl std::future::Future<Output = Result<MessageId, PlatformError>> + Send;

    /// Replace the body of an existing message.
    fn edit_message(
        &self,
        channel: &ChannelId,
        message: &MessageId,
        content: &str,
    ) -> impl std::future::Future<Output = Result<(), PlatformError>> + Send;
}
