//! Bot API HTTP client.

use crate::types::{
    AdminRights, ApiResponse, ChatMember, ChatMemberParams, GetUpdates, Message, NoParams,
    PromoteChatMember, SendMessage, Update, User,
};
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, instrument};
use warden_core::{ChannelId, MemberStatus, UserId};
use warden_error::{PlatformError, PlatformErrorKind, PlatformResult};
use warden_guard::{MembershipApi, Notifier};

type DirectRateLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Public Bot API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Update types requested from `getUpdates`.
pub const ALLOWED_UPDATES: &[&str] = &["message", "chat_member"];

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Map a failed Bot API call to an error kind.
///
/// The Bot API reports most failures as `400 Bad Request` and only the
/// description tells them apart.
pub fn api_error_kind(code: u16, description: &str, retry_after: Option<u64>) -> PlatformErrorKind {
    let lower = description.to_ascii_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));
    match code {
        401 => PlatformErrorKind::Unauthorized,
        403 => PlatformErrorKind::Forbidden(description.to_string()),
        429 => PlatformErrorKind::RateLimited {
            retry_after: retry_after.unwrap_or(1),
        },
        400 if has(&["not enough rights", "chat_admin_required", "have no rights"]) => {
            PlatformErrorKind::InsufficientRights(description.to_string())
        }
        400 if has(&["user not found", "participant_id_invalid", "user_not_participant"]) => {
            PlatformErrorKind::MemberNotFound(description.to_string())
        }
        400 if has(&["already banned", "user is banned"]) => {
            PlatformErrorKind::AlreadyBanned(description.to_string())
        }
        500..=599 => PlatformErrorKind::Transport(format!("{}: {}", code, description)),
        _ => PlatformErrorKind::BadRequest(format!("{}: {}", code, description)),
    }
}

/// Telegram Bot API client.
///
/// Every call waits on a shared rate limiter first, so clones of one client
/// share the budget.
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    endpoint: String,
    limiter: Arc<DirectRateLimiter>,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient").finish_non_exhaustive()
    }
}

impl TelegramClient {
    /// Client for the bot identified by `token`, talking to `api_base`.
    ///
    /// A zero `calls_per_minute` is treated as one.
    pub fn new(api_base: &str, token: &str, calls_per_minute: u32) -> Self {
        let rate = NonZeroU32::new(calls_per_minute).unwrap_or(NonZeroU32::MIN);
        debug!(calls_per_minute = rate.get(), "Creating Telegram client");
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/bot{}", api_base.trim_end_matches('/'), token),
            limiter: Arc::new(GovernorRateLimiter::direct(Quota::per_minute(rate))),
        }
    }

    #[instrument(skip(self, params, timeout))]
    async fn call<P, R>(&self, method: &str, params: &P, timeout: Duration) -> PlatformResult<R>
    where
        P: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        self.limiter.until_ready().await;

        let response = self
            .http
            .post(format!("{}/{}", self.endpoint, method))
            .json(params)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                error!(error = %e, "Bot API request failed");
                PlatformError::new(PlatformErrorKind::Transport(e.to_string()))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            PlatformError::new(PlatformErrorKind::Transport(e.without_url().to_string()))
        })?;

        let parsed: ApiResponse<R> = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) if status.is_success() => {
                return Err(PlatformError::new(PlatformErrorKind::InvalidResponse(
                    e.to_string(),
                )));
            }
            Err(_) => {
                return Err(PlatformError::new(api_error_kind(
                    status.as_u16(),
                    &body,
                    None,
                )));
            }
        };

        if parsed.ok {
            return parsed.result.ok_or_else(|| {
                PlatformError::new(PlatformErrorKind::InvalidResponse(
                    "successful response without result".to_string(),
                ))
            });
        }

        let code = parsed.error_code.unwrap_or(status.as_u16());
        let description = parsed.description.unwrap_or_default();
        let retry_after = parsed.parameters.and_then(|p| p.retry_after);
        debug!(code, description = %description, "Bot API call rejected");
        Err(PlatformError::new(api_error_kind(code, &description, retry_after)))
    }

    /// The bot's own account.
    pub async fn get_me(&self) -> PlatformResult<User> {
        self.call("getMe", &NoParams {}, REQUEST_TIMEOUT).await
    }

    /// Long-poll for updates after `offset`, waiting up to `timeout_secs`.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> PlatformResult<Vec<Update>> {
        let params = GetUpdates {
            offset,
            timeout: timeout_secs,
            allowed_updates: ALLOWED_UPDATES,
        };
        let timeout = Duration::from_secs(timeout_secs) + REQUEST_TIMEOUT;
        self.call("getUpdates", &params, timeout).await
    }

    /// Membership of `user` in `chat`.
    pub async fn get_chat_member(&self, chat: ChannelId, user: UserId) -> PlatformResult<ChatMember> {
        let params = ChatMemberParams {
            chat_id: chat.0,
            user_id: user.0,
        };
        self.call("getChatMember", &params, REQUEST_TIMEOUT).await
    }

    /// Set the administrator rights of `user` in `chat`.
    pub async fn promote_chat_member(
        &self,
        chat: ChannelId,
        user: UserId,
        rights: AdminRights,
    ) -> PlatformResult<bool> {
        let params = PromoteChatMember {
            chat_id: chat.0,
            user_id: user.0,
            rights,
        };
        self.call("promoteChatMember", &params, REQUEST_TIMEOUT).await
    }

    /// Ban `user` from `chat`.
    pub async fn ban_chat_member(&self, chat: ChannelId, user: UserId) -> PlatformResult<bool> {
        let params = ChatMemberParams {
            chat_id: chat.0,
            user_id: user.0,
        };
        self.call("banChatMember", &params, REQUEST_TIMEOUT).await
    }

    /// Post `text` to `chat`.
    pub async fn send_message(&self, chat: ChannelId, text: &str) -> PlatformResult<Message> {
        let params = SendMessage {
            chat_id: chat.0,
            text,
        };
        self.call("sendMessage", &params, REQUEST_TIMEOUT).await
    }
}

fn refused(method: &str) -> PlatformError {
    PlatformError::new(PlatformErrorKind::BadRequest(format!(
        "{} returned false",
        method
    )))
}

#[async_trait]
impl MembershipApi for TelegramClient {
    async fn get_member_status(
        &self,
        channel: ChannelId,
        user: UserId,
    ) -> PlatformResult<MemberStatus> {
        let member = self.get_chat_member(channel, user).await?;
        Ok(MemberStatus::parse(&member.status))
    }

    #[instrument(skip(self), fields(channel_id = %channel, user_id = %user))]
    async fn demote(&self, channel: ChannelId, user: UserId) -> PlatformResult<()> {
        if self.promote_chat_member(channel, user, AdminRights::none()).await? {
            Ok(())
        } else {
            Err(refused("promoteChatMember"))
        }
    }

    #[instrument(skip(self), fields(channel_id = %channel, user_id = %user))]
    async fn ban(&self, channel: ChannelId, user: UserId) -> PlatformResult<()> {
        if self.ban_chat_member(channel, user).await? {
            Ok(())
        } else {
            Err(refused("banChatMember"))
        }
    }
}

#[async_trait]
impl Notifier for TelegramClient {
    async fn send(&self, channel: ChannelId, text: &str) -> PlatformResult<()> {
        self.send_message(channel, text).await.map(|_| ())
    }
}
