//! Chat platform collaborator traits.

use async_trait::async_trait;
use warden_core::{ChannelId, MemberStatus, UserId};
use warden_error::PlatformResult;

/// Membership operations on the chat platform.
///
/// Implementations report failures as [`warden_error::PlatformError`]; the
/// remediation engine decides per call whether a failure is fatal.
#[async_trait]
pub trait MembershipApi: Send + Sync {
    /// Current status of `user` in `channel`.
    ///
    /// # Errors
    ///
    /// Returns error if the platform cannot be reached or refuses the lookup.
    async fn get_member_status(&self, channel: ChannelId, user: UserId)
    -> PlatformResult<MemberStatus>;

    /// Strip every administrative right from `user` in `channel`.
    ///
    /// # Errors
    ///
    /// Returns error if the rights could not be removed.
    async fn demote(&self, channel: ChannelId, user: UserId) -> PlatformResult<()>;

    /// Ban `user` from `channel`.
    ///
    /// # Errors
    ///
    /// Returns error if the ban was refused. A user that is already banned
    /// may be reported as [`warden_error::PlatformErrorKind::AlreadyBanned`].
    async fn ban(&self, channel: ChannelId, user: UserId) -> PlatformResult<()>;
}

/// Posts text messages into a channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send `text` to `channel`.
    ///
    /// # Errors
    ///
    /// Returns error if the message could not be delivered.
    async fn send(&self, channel: ChannelId, text: &str) -> PlatformResult<()>;
}

/// Notifier that drops every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpNotifier;

#[async_trait]
impl Notifier for NoOpNotifier {
    async fn send(&self, _channel: ChannelId, _text: &str) -> PlatformResult<()> {
        Ok(())
    }
}
