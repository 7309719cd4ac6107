// src/services/fanout.rs
//
// Notification sink. Delivery is best-effort relative to the primary status
// update: a failed insert is logged and never aborts the caller's operation.

use chrono::Utc;
use mongodb::{Collection, Database};

use crate::errors::Result;
use crate::models::notification::{Notification, NotificationKind};

pub const NOTIFICATIONS_COLLECTION: &str = "notifications";

/// Unpersisted notification content, produced by the approval engine's
/// planning step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub details: String,
    pub kind: NotificationKind,
    pub related_type: Option<String>,
    pub related_id: Option<String>,
}

#[derive(Clone)]
pub struct Notifier {
    db: Database,
}

impl Notifier {
    pub fn new(db: Database) -> Self {
        Notifier { db }
    }

    fn collection(&self) -> Collection<Notification> {
        self.db.collection(NOTIFICATIONS_COLLECTION)
    }

    /// Persists a notification, propagating storage errors. Used by the
    /// direct notification API.
    pub async fn notify(&self, draft: NotificationDraft) -> Result<Notification> {
        let mut notification = Notification {
            id: None,
            user_id: draft.user_id,
            title: draft.title,
            description: draft.description,
            details: draft.details,
            kind: draft.kind,
            related_type: draft.related_type,
            related_id: draft.related_id,
            is_read: false,
            created_at: Utc::now(),
        };

        let inserted = self.collection().insert_one(&notification).await?;
        notification.id = inserted.inserted_id.as_object_id();
        Ok(notification)
    }

    /// Best-effort variant used by the approval fan-out: failures are logged
    /// and swallowed so the user-visible transition is not aborted.
    pub async fn notify_best_effort(&self, draft: NotificationDraft) {
        let user_id = draft.user_id.clone();
        let title = draft.title.clone();
        match self.notify(draft).await {
            Ok(_) => {
                tracing::info!("📬 Notification '{}' delivered to user {}", title, user_id);
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to persist notification '{}' for user {}: {}",
                    title,
                    user_id,
                    e
                );
            }
        }
    }
}
