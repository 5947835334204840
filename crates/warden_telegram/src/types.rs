//! Telegram Bot API models.
//!
//! Only the fields the guard reads are modelled; unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// Envelope around every Bot API response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the call succeeded
    pub ok: bool,
    /// Payload of a successful call
    pub result: Option<T>,
    /// Error text of a failed call
    #[serde(default)]
    pub description: Option<String>,
    /// Error code of a failed call
    #[serde(default)]
    pub error_code: Option<u16>,
    /// Extra error details
    #[serde(default)]
    pub parameters: Option<ResponseParameters>,
}

/// Extra details attached to a failed call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseParameters {
    /// Seconds to wait after flood control kicked in
    #[serde(default)]
    pub retry_after: Option<u64>,
}

/// A Telegram account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account ID
    pub id: i64,
    /// Whether the account is a bot
    #[serde(default)]
    pub is_bot: bool,
    /// Display name
    #[serde(default)]
    pub first_name: String,
    /// Public handle without `@`
    #[serde(default)]
    pub username: Option<String>,
}

/// A chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    /// Chat ID; negative for groups and channels
    pub id: i64,
    /// `private`, `group`, `supergroup` or `channel`
    #[serde(rename = "type")]
    pub kind: String,
    /// Title of groups and channels
    #[serde(default)]
    pub title: Option<String>,
}

/// A message; only text messages matter here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message ID within the chat
    pub message_id: i64,
    /// Sender; absent for channel posts
    #[serde(default)]
    pub from: Option<User>,
    /// Chat the message belongs to
    pub chat: Chat,
    /// Unix time the message was sent
    #[serde(default)]
    pub date: i64,
    /// Text of a text message
    #[serde(default)]
    pub text: Option<String>,
}

/// A user's membership in a chat.
///
/// The Bot API sends a different object per status; the administrator
/// rights are only present for `administrator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMember {
    /// `creator`, `administrator`, `member`, `restricted`, `left` or `kicked`
    pub status: String,
    /// The member
    pub user: User,
    /// May ban and restrict members
    #[serde(default)]
    pub can_restrict_members: Option<bool>,
    /// May appoint administrators
    #[serde(default)]
    pub can_promote_members: Option<bool>,
}

/// A change of a member's status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMemberUpdated {
    /// Chat the change happened in
    pub chat: Chat,
    /// Who made the change
    pub from: User,
    /// Unix time of the change
    #[serde(default)]
    pub date: i64,
    /// Membership before the change
    pub old_chat_member: ChatMember,
    /// Membership after the change
    pub new_chat_member: ChatMember,
}

/// One item from `getUpdates`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    /// Monotonic update ID
    pub update_id: i64,
    /// New message
    #[serde(default)]
    pub message: Option<Message>,
    /// Membership change of another user
    #[serde(default)]
    pub chat_member: Option<ChatMemberUpdated>,
}

/// Administrator rights sent with `promoteChatMember`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AdminRights {
    /// Access the chat event log and statistics
    pub can_manage_chat: bool,
    /// Delete messages of other users
    pub can_delete_messages: bool,
    /// Manage video chats
    pub can_manage_video_chats: bool,
    /// Ban and restrict members
    pub can_restrict_members: bool,
    /// Appoint administrators
    pub can_promote_members: bool,
    /// Change the title, photo and other settings
    pub can_change_info: bool,
    /// Invite new users
    pub can_invite_users: bool,
    /// Pin messages
    pub can_pin_messages: bool,
    /// Post in the channel
    pub can_post_messages: bool,
    /// Edit messages of other users
    pub can_edit_messages: bool,
}

impl AdminRights {
    /// No rights at all; promoting with these demotes.
    pub fn none() -> Self {
        Self::default()
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PromoteChatMember {
    pub chat_id: i64,
    pub user_id: i64,
    #[serde(flatten)]
    pub rights: AdminRights,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMemberParams {
    pub chat_id: i64,
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct SendMessage<'a> {
    pub chat_id: i64,
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct GetUpdates<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    pub timeout: u64,
    pub allowed_updates: &'a [&'a str],
}

#[derive(Debug, Serialize)]
pub(crate) struct NoParams {}
