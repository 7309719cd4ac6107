use axum::{
    routing::{get, post, put},
    Router,
};
use crate::{handlers::notifications::*, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_notification))
        .route("/user/:user_id", get(get_user_notifications))
        .route("/:id/read", put(mark_notification_read))
        .route("/mark-all-read", put(mark_all_notifications_read))
}
