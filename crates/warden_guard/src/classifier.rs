//! Membership transition classifier.

use tracing::debug;
use warden_core::{BanEvent, BanPolicy, MemberStatus, MembershipTransition};

/// Whether a status change is a ban under `policy`.
///
/// # Examples
///
/// ```
/// use warden_core::{BanPolicy, MemberStatus};
/// use warden_guard::is_ban_transition;
///
/// let policy = BanPolicy::default();
/// assert!(is_ban_transition(MemberStatus::Member, MemberStatus::Kicked, policy));
/// assert!(!is_ban_transition(MemberStatus::Left, MemberStatus::Kicked, policy));
/// assert!(is_ban_transition(MemberStatus::Left, MemberStatus::Kicked, BanPolicy::including_left()));
/// ```
pub fn is_ban_transition(old: MemberStatus, new: MemberStatus, policy: BanPolicy) -> bool {
    match (old, new) {
        (MemberStatus::Member | MemberStatus::Restricted, MemberStatus::Kicked) => true,
        (MemberStatus::Left, MemberStatus::Kicked) => policy.count_left_as_ban,
        _ => false,
    }
}

/// Decide whether a transition is one user banning another.
///
/// Returns `None` for unsupervised chat kinds, for transitions that are not
/// bans, and for bans nobody can be held responsible for (no actor).
pub fn classify(transition: &MembershipTransition, policy: BanPolicy) -> Option<BanEvent> {
    if !transition.chat_kind.is_supervised() {
        return None;
    }
    if !is_ban_transition(transition.old_status, transition.new_status, policy) {
        return None;
    }
    let Some(actor) = transition.actor.clone() else {
        debug!(
            channel_id = %transition.channel_id,
            subject_id = %transition.subject.id,
            "Ban without attributable actor ignored"
        );
        return None;
    };
    if actor.id == transition.subject.id {
        return None;
    }
    Some(BanEvent {
        channel_id: transition.channel_id,
        actor,
        subject: transition.subject.clone(),
        old_status: transition.old_status,
    })
}
