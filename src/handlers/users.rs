use axum::{
    extract::{Path, Query, State},
    response::Json,
};

use crate::{
    dtos::notification_dtos::ActivityQuery,
    errors::Result,
    models::activity::ActivityLogEntry,
    services::activity::ActivityLog,
    state::AppState,
};

// Per-user activity feed, newest first. Only entries the user is allowed
// to see are returned.
pub async fn get_user_activity(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<ActivityLogEntry>>> {
    let entries = ActivityLog::new(state.db.clone())
        .get_for_user(&user_id, query.limit)
        .await?;
    Ok(Json(entries))
}
