use axum::{
    routing::{get, put},
    Router,
};
use crate::{handlers::transactions::*, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_transactions).post(create_transaction))
        .route("/:id", get(get_transaction))
        .route("/:id/status", put(update_transaction_status))
        .route("/:id/resubmit", put(resubmit_transaction))
        .route("/:id/timeline", get(get_transaction_timeline))
        .route("/:id/bank-details", get(get_bank_details))
}
