use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use rust_decimal::Decimal;
use validator::Validate;

use crate::{
    dtos::transaction_dtos::{
        CreateTransactionRequest, ResubmitRequest, TransactionQuery, UpdateStatusRequest,
    },
    errors::{AppError, Result},
    models::timeline::TimelineEvent,
    models::transaction::{generate_transaction_ref, BankDetails, Transaction, TransactionStatus},
    services::activity::ActivityLog,
    services::store::{self, TransactionStore},
    services::timeline::TimelineService,
    state::AppState,
};

// Create a new transaction (always starts pending)
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(payload): Json<CreateTransactionRequest>,
) -> Result<Json<Transaction>> {
    tracing::info!("💸 Creating transaction for sender {}", payload.sender_id);

    payload.validate()?;
    if payload.amount <= Decimal::ZERO {
        return Err(AppError::validation("Amount must be greater than zero"));
    }

    let sender = store::find_user_by_user_id(&state.db, &payload.sender_id)
        .await?
        .ok_or_else(|| AppError::validation(format!("Unknown sender {}", payload.sender_id)))?;

    let now = Utc::now();
    let transaction = Transaction {
        id: None,
        transaction_ref: generate_transaction_ref(now),
        department: sender.department.clone(),
        sender_department: sender.department.clone(),
        sender_id: sender.user_id.clone(),
        recipient: payload.recipient,
        recipient_type: payload.recipient_type,
        recipient_department: payload.recipient_department,
        purpose: payload.purpose,
        description: payload.description,
        amount: payload.amount,
        currency: payload.currency.to_uppercase(),
        payment_method: payload.payment_method,
        bank_details: payload.bank_details,
        status: TransactionStatus::Pending,
        change_request_note: None,
        change_requested_at: None,
        change_requested_by: None,
        approved_by: None,
        approved_at: None,
        created_at: now,
        updated_at: now,
    };

    let transaction = TransactionStore::new(state.db.clone())
        .insert(transaction)
        .await?;
    let transaction_id = transaction.id.map(|id| id.to_hex()).unwrap_or_default();

    TimelineService::new(state.db.clone())
        .append(
            &transaction_id,
            "Created",
            &sender.user_id,
            &sender.department,
            "Transaction created",
        )
        .await?;

    ActivityLog::new(state.db.clone())
        .record_best_effort(
            &sender.user_id,
            &format!("Created transaction {}", transaction.transaction_ref),
            &format!(
                "Transaction from {} to {} for {} {}",
                transaction.department,
                transaction.recipient_department,
                transaction.currency,
                transaction.amount
            ),
            vec![sender.user_id.clone()],
        )
        .await;

    tracing::info!("✅ Created transaction {}", transaction.transaction_ref);
    Ok(Json(transaction))
}

// List transactions with optional status/department filters
pub async fn get_transactions(
    State(state): State<AppState>,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<Vec<Transaction>>> {
    let transactions = TransactionStore::new(state.db.clone())
        .list(query.status.as_deref(), query.department.as_deref())
        .await?;
    tracing::info!("🔍 Listed {} transactions", transactions.len());
    Ok(Json(transactions))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Transaction>> {
    let oid = ObjectId::parse_str(&id)?;
    let transaction = TransactionStore::new(state.db.clone()).get(oid).await?;
    Ok(Json(transaction))
}

// Apply a reviewer transition (approve / reject / request changes)
pub async fn update_transaction_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Transaction>> {
    tracing::info!(
        "⚖️ Status update for transaction {}: {} by user {}",
        id,
        payload.status,
        payload.user_id
    );

    let updated = state
        .approval_engine()
        .apply_transition(&id, &payload.status, &payload.user_id, payload.note.as_deref())
        .await?;
    Ok(Json(updated))
}

// Sender resubmits a change-requested transaction
pub async fn resubmit_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ResubmitRequest>,
) -> Result<Json<Transaction>> {
    let updated = state
        .approval_engine()
        .resubmit(&id, &payload.user_id)
        .await?;
    Ok(Json(updated))
}

// Full audit trail, oldest first
pub async fn get_transaction_timeline(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<TimelineEvent>>> {
    let oid = ObjectId::parse_str(&id)?;
    // 404 on unknown transaction rather than an empty timeline.
    TransactionStore::new(state.db.clone()).get(oid).await?;
    let events = TimelineService::new(state.db.clone())
        .list_for(&oid.to_hex())
        .await?;
    Ok(Json(events))
}

pub async fn get_bank_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BankDetails>> {
    let oid = ObjectId::parse_str(&id)?;
    let transaction = TransactionStore::new(state.db.clone()).get(oid).await?;
    transaction
        .bank_details
        .map(Json)
        .ok_or_else(|| {
            AppError::not_found(format!(
                "Transaction {} has no bank details",
                transaction.transaction_ref
            ))
        })
}
