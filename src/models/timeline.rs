use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// One entry in a transaction's audit trail. Immutable once written;
/// displayed oldest-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub transaction_id: String,
    /// Display label, e.g. "Created", "Approved", "Change Requested".
    pub status: String,
    pub user_id: String,
    pub department: String,
    pub notes: String,
    #[serde(with = "crate::models::datetime")]
    pub created_at: DateTime<Utc>,
}
