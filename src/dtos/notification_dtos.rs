use serde::Deserialize;
use validator::Validate;

use crate::models::notification::NotificationKind;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateNotificationRequest {
    pub user_id: String,

    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub details: String,

    #[serde(default = "default_kind")]
    pub kind: NotificationKind,

    pub related_type: Option<String>,
    pub related_id: Option<String>,
}

fn default_kind() -> NotificationKind {
    NotificationKind::Info
}

#[derive(Debug, Deserialize)]
pub struct MarkAllReadRequest {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<i64>,
}
