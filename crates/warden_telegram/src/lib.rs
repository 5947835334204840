//! Telegram Bot API adapter for the warden guard.
//!
//! - [`TelegramClient`] talks to the Bot API and implements the guard's
//!   [`warden_guard::MembershipApi`] and [`warden_guard::Notifier`] seams.
//! - [`to_transition`] turns `chat_member` updates into membership transitions.
//! - [`UpdatePoller`] long-polls for updates and routes them to the
//!   [`warden_guard::Guard`] and the [`CommandHandler`].
//! - [`check_bot_permissions`] reports rights the bot is missing in a chat.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod commands;
mod convert;
mod permissions;
mod poller;
mod types;

pub use client::{ALLOWED_UPDATES, DEFAULT_API_BASE, TelegramClient, api_error_kind};
pub use commands::{Access, Command, CommandHandler, parse_switch};
pub use convert::{ANONYMOUS_ADMIN_ID, CHANNEL_BOT_ID, is_anonymous_actor, to_transition, user_ref};
pub use permissions::{BotPermissions, check_bot_permissions};
pub use poller::UpdatePoller;
pub use types::{
    AdminRights, ApiResponse, Chat, ChatMember, ChatMemberUpdated, Message, ResponseParameters,
    Update, User,
};
