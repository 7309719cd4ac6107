// src/services/timeline.rs

use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::{bson::doc, Collection, Database};

use crate::errors::Result;
use crate::models::timeline::TimelineEvent;

pub const TIMELINE_COLLECTION: &str = "transaction_timeline";

#[derive(Clone)]
pub struct TimelineService {
    db: Database,
}

impl TimelineService {
    pub fn new(db: Database) -> Self {
        TimelineService { db }
    }

    fn collection(&self) -> Collection<TimelineEvent> {
        self.db.collection(TIMELINE_COLLECTION)
    }

    pub async fn append(
        &self,
        transaction_id: &str,
        status_label: &str,
        user_id: &str,
        department: &str,
        notes: &str,
    ) -> Result<TimelineEvent> {
        let mut event = TimelineEvent {
            id: None,
            transaction_id: transaction_id.to_string(),
            status: status_label.to_string(),
            user_id: user_id.to_string(),
            department: department.to_string(),
            notes: notes.to_string(),
            created_at: Utc::now(),
        };

        let inserted = self.collection().insert_one(&event).await?;
        event.id = inserted.inserted_id.as_object_id();
        Ok(event)
    }

    /// Chronological display order: oldest first.
    pub async fn list_for(&self, transaction_id: &str) -> Result<Vec<TimelineEvent>> {
        let cursor = self
            .collection()
            .find(doc! { "transaction_id": transaction_id })
            .sort(doc! { "created_at": 1 })
            .await?;
        let events: Vec<TimelineEvent> = cursor.try_collect().await?;
        Ok(events)
    }
}
