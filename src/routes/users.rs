use axum::{routing::get, Router};
use crate::{handlers::users::*, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/:id/activity-log", get(get_user_activity))
}
