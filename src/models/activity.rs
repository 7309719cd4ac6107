use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A per-user audit record. `visible_to` limits who sees the entry in their
/// feed; an empty list means the acting user only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub user_id: String,
    pub action: String,
    pub details: String,
    #[serde(default)]
    pub visible_to: Vec<String>,
    #[serde(with = "crate::models::datetime")]
    pub created_at: DateTime<Utc>,
}

impl ActivityLogEntry {
    /// Visibility rule for activity feeds: an entry shows up for a user if
    /// they are listed in visible_to, or if visible_to is empty and they are
    /// the acting user.
    pub fn is_visible_to(&self, user_id: &str) -> bool {
        if self.visible_to.is_empty() {
            self.user_id == user_id
        } else {
            self.visible_to.iter().any(|u| u == user_id)
        }
    }
}
