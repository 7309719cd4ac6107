use axum::{
    extract::{Path, State},
    response::Json,
};
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Collection,
};
use serde_json::json;
use validator::Validate;

use crate::{
    dtos::notification_dtos::{CreateNotificationRequest, MarkAllReadRequest},
    errors::{AppError, Result},
    models::notification::Notification,
    services::fanout::{NotificationDraft, Notifier, NOTIFICATIONS_COLLECTION},
    state::AppState,
};

const FEED_LIMIT: i64 = 50;

// Create a notification directly (used by collaborating workflows,
// e.g. the document module; the approval engine goes through the
// fan-out internally)
pub async fn create_notification(
    State(state): State<AppState>,
    Json(payload): Json<CreateNotificationRequest>,
) -> Result<Json<Notification>> {
    payload.validate()?;

    let notification = Notifier::new(state.db.clone())
        .notify(NotificationDraft {
            user_id: payload.user_id,
            title: payload.title,
            description: payload.description,
            details: payload.details,
            kind: payload.kind,
            related_type: payload.related_type,
            related_id: payload.related_id,
        })
        .await?;

    Ok(Json(notification))
}

// Get a user's notifications, newest first
pub async fn get_user_notifications(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Notification>>> {
    tracing::info!("📬 Getting notifications for user {}", user_id);

    let collection: Collection<Notification> = state.db.collection(NOTIFICATIONS_COLLECTION);
    let cursor = collection
        .find(doc! { "user_id": &user_id })
        .sort(doc! { "created_at": -1 })
        .limit(FEED_LIMIT)
        .await?;
    let notifications: Vec<Notification> = cursor.try_collect().await?;

    Ok(Json(notifications))
}

// Mark a single notification as read
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let oid = ObjectId::parse_str(&id)?;

    let collection: Collection<Notification> = state.db.collection(NOTIFICATIONS_COLLECTION);
    let result = collection
        .update_one(doc! { "_id": oid }, doc! { "$set": { "is_read": true } })
        .await?;

    if result.matched_count == 0 {
        return Err(AppError::not_found(format!("Notification {} not found", id)));
    }

    Ok(Json(json!({
        "success": true,
        "message": "Notification marked as read",
    })))
}

// Mark all of a user's unread notifications as read
pub async fn mark_all_notifications_read(
    State(state): State<AppState>,
    Json(payload): Json<MarkAllReadRequest>,
) -> Result<Json<serde_json::Value>> {
    let collection: Collection<Notification> = state.db.collection(NOTIFICATIONS_COLLECTION);
    let result = collection
        .update_many(
            doc! { "user_id": &payload.user_id, "is_read": false },
            doc! { "$set": { "is_read": true } },
        )
        .await?;

    tracing::info!(
        "📖 Marked {} notifications as read for user {}",
        result.modified_count,
        payload.user_id
    );

    Ok(Json(json!({
        "success": true,
        "modified_count": result.modified_count,
    })))
}
