use crate::notification::{ActivityType, Notification};
use crate::shared::entity::ID;

/// The at-most-one relationship between an activity and a scheduled
/// notification for one user. The bound notification id lives here as
/// explicit state; on a cold start it is re-derived with the documented
/// fetch query rather than kept in ambient session state.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityBinding {
    pub activity_id: ID,
    pub activity_type: ActivityType,
    pub user_id: ID,
    pub notification: Option<Notification>,
}

impl ActivityBinding {
    pub fn unbound(activity_id: ID, activity_type: ActivityType, user_id: ID) -> Self {
        Self {
            activity_id,
            activity_type,
            user_id,
            notification: None,
        }
    }

    /// Id of the currently bound notification, when one exists.
    pub fn notification_ref(&self) -> Option<&ID> {
        self.notification.as_ref().map(|n| &n.id)
    }
}
