//! Bot API updates to guard vocabulary.

use crate::types::{ChatMemberUpdated, User};
use warden_core::{ChannelId, ChatKind, MemberStatus, MembershipTransition, UserRef};

/// `GroupAnonymousBot`, shown as the actor when an anonymous admin acts.
pub const ANONYMOUS_ADMIN_ID: i64 = 1087968824;

/// Service account shown as the actor of signed channel actions.
pub const CHANNEL_BOT_ID: i64 = 136817688;

/// Whether `user` is a placeholder that hides the real actor.
pub fn is_anonymous_actor(user: &User) -> bool {
    matches!(user.id, ANONYMOUS_ADMIN_ID | CHANNEL_BOT_ID)
}

/// Guard-side reference to a Telegram account.
pub fn user_ref(user: &User) -> UserRef {
    UserRef {
        id: user.id.into(),
        username: user.username.clone(),
    }
}

/// Convert a `chat_member` update into a membership transition.
///
/// Anonymous placeholders become a missing actor, so the ban cannot be
/// attributed to anyone.
pub fn to_transition(update: &ChatMemberUpdated) -> MembershipTransition {
    let actor = (!is_anonymous_actor(&update.from)).then(|| user_ref(&update.from));
    MembershipTransition {
        channel_id: ChannelId(update.chat.id),
        chat_kind: ChatKind::parse(&update.chat.kind),
        subject: user_ref(&update.new_chat_member.user),
        old_status: MemberStatus::parse(&update.old_chat_member.status),
        new_status: MemberStatus::parse(&update.new_chat_member.status),
        actor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::UserId;

    fn update(actor: i64) -> ChatMemberUpdated {
        serde_json::from_value(serde_json::json!({
            "chat": {"id": -100123, "type": "channel", "title": "News"},
            "from": {"id": actor, "is_bot": false, "first_name": "Mallory", "username": "mallory"},
            "date": 1700000000,
            "old_chat_member": {
                "status": "member",
                "user": {"id": 777, "is_bot": false, "first_name": "Alice"}
            },
            "new_chat_member": {
                "status": "kicked",
                "user": {"id": 777, "is_bot": false, "first_name": "Alice"},
                "until_date": 0
            }
        }))
        .expect("valid update")
    }

    #[test]
    fn test_ban_update_converts() {
        let t = to_transition(&update(555));
        assert_eq!(t.channel_id, ChannelId(-100123));
        assert_eq!(t.chat_kind, ChatKind::Channel);
        assert_eq!(t.subject.id, UserId(777));
        assert_eq!(t.old_status, MemberStatus::Member);
        assert_eq!(t.new_status, MemberStatus::Kicked);
        let actor = t.actor.expect("actor");
        assert_eq!(actor.id, UserId(555));
        assert_eq!(actor.username.as_deref(), Some("mallory"));
    }

    #[test]
    fn test_anonymous_actors_are_dropped() {
        for id in [ANONYMOUS_ADMIN_ID, CHANNEL_BOT_ID] {
            assert!(to_transition(&update(id)).actor.is_none());
        }
    }
}
