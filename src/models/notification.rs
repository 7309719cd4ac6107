use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Severity/intent of a notification, mirrored in the dashboard styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Recipient user.
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub details: String,
    pub kind: NotificationKind,

    /// Weak reference to the record this notification is about,
    /// e.g. related_type = "transaction".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_id: Option<String>,

    pub is_read: bool,
    #[serde(with = "crate::models::datetime")]
    pub created_at: DateTime<Utc>,
}
