// src/services/activity.rs

use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::{bson::doc, Collection, Database};

use crate::errors::Result;
use crate::models::activity::ActivityLogEntry;

pub const ACTIVITY_COLLECTION: &str = "activity_log";

const DEFAULT_FEED_LIMIT: i64 = 20;

#[derive(Clone)]
pub struct ActivityLog {
    db: Database,
}

impl ActivityLog {
    pub fn new(db: Database) -> Self {
        ActivityLog { db }
    }

    fn collection(&self) -> Collection<ActivityLogEntry> {
        self.db.collection(ACTIVITY_COLLECTION)
    }

    pub async fn record(
        &self,
        user_id: &str,
        action: &str,
        details: &str,
        visible_to: Vec<String>,
    ) -> Result<ActivityLogEntry> {
        let mut entry = ActivityLogEntry {
            id: None,
            user_id: user_id.to_string(),
            action: action.to_string(),
            details: details.to_string(),
            visible_to,
            created_at: Utc::now(),
        };

        let inserted = self.collection().insert_one(&entry).await?;
        entry.id = inserted.inserted_id.as_object_id();
        Ok(entry)
    }

    /// Best-effort variant used inside the approval fan-out.
    pub async fn record_best_effort(
        &self,
        user_id: &str,
        action: &str,
        details: &str,
        visible_to: Vec<String>,
    ) {
        if let Err(e) = self.record(user_id, action, details, visible_to).await {
            tracing::warn!("Failed to record activity '{}' for user {}: {}", action, user_id, e);
        }
    }

    /// Feed for one user, newest first. An entry qualifies when the user is
    /// in visible_to, or visible_to is empty/missing and the user is the
    /// actor (same rule as ActivityLogEntry::is_visible_to).
    pub async fn get_for_user(&self, user_id: &str, limit: Option<i64>) -> Result<Vec<ActivityLogEntry>> {
        let filter = Self::visibility_filter(user_id);
        let cursor = self
            .collection()
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .limit(limit.unwrap_or(DEFAULT_FEED_LIMIT))
            .await?;
        let entries: Vec<ActivityLogEntry> = cursor.try_collect().await?;
        Ok(entries)
    }

    fn visibility_filter(user_id: &str) -> mongodb::bson::Document {
        doc! {
            "$or": [
                { "visible_to": user_id },
                {
                    "user_id": user_id,
                    "$or": [
                        { "visible_to": { "$size": 0 } },
                        { "visible_to": { "$exists": false } },
                    ],
                },
            ]
        }
    }
}
