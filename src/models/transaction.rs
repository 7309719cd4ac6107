// models/transaction.rs
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle of a fund-transfer request. Only `pending` transactions can be
/// transitioned by an approver; `approved` and `rejected` are terminal, and
/// `change_requested` goes back to `pending` when the sender resubmits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Approved,
    Rejected,
    ChangeRequested,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Approved => "approved",
            TransactionStatus::Rejected => "rejected",
            TransactionStatus::ChangeRequested => "change_requested",
        }
    }

    /// Display label used on timeline entries.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "Pending",
            TransactionStatus::Approved => "Approved",
            TransactionStatus::Rejected => "Rejected",
            TransactionStatus::ChangeRequested => "Change Requested",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TransactionStatus::Approved | TransactionStatus::Rejected)
    }

    /// An approver may only act on a pending transaction.
    pub fn accepts_transition(&self) -> bool {
        matches!(self, TransactionStatus::Pending)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "approved" => Ok(TransactionStatus::Approved),
            "rejected" => Ok(TransactionStatus::Rejected),
            "change_requested" => Ok(TransactionStatus::ChangeRequested),
            other => Err(format!("unknown transaction status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankDetails {
    pub bank_name: String,
    pub account_name: String,
    pub account_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swift_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Human-readable reference, unique across the system.
    pub transaction_ref: String,

    // Sender side
    pub department: String,
    pub sender_department: String,
    pub sender_id: String,

    // Recipient side
    pub recipient: String,
    pub recipient_type: String,
    pub recipient_department: String,

    pub purpose: String,
    pub description: String,
    pub amount: Decimal,
    pub currency: String,
    pub payment_method: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_details: Option<BankDetails>,

    pub status: TransactionStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_request_note: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::models::datetime::option"
    )]
    pub change_requested_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_requested_by: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::models::datetime::option"
    )]
    pub approved_at: Option<DateTime<Utc>>,

    #[serde(with = "crate::models::datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::models::datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Generates a reference like TRX-20260826-4F2A1C.
pub fn generate_transaction_ref(now: DateTime<Utc>) -> String {
    let suffix: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(6)
        .collect();
    format!("TRX-{}-{}", now.format("%Y%m%d"), suffix.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_snake_case() {
        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Approved,
            TransactionStatus::Rejected,
            TransactionStatus::ChangeRequested,
        ] {
            let parsed: TransactionStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);

            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn unknown_status_fails_to_parse() {
        assert!("completed".parse::<TransactionStatus>().is_err());
    }

    #[test]
    fn only_pending_accepts_transitions() {
        assert!(TransactionStatus::Pending.accepts_transition());
        assert!(!TransactionStatus::Approved.accepts_transition());
        assert!(!TransactionStatus::Rejected.accepts_transition());
        assert!(!TransactionStatus::ChangeRequested.accepts_transition());
    }

    #[test]
    fn terminal_states() {
        assert!(TransactionStatus::Approved.is_terminal());
        assert!(TransactionStatus::Rejected.is_terminal());
        assert!(!TransactionStatus::Pending.is_terminal());
        assert!(!TransactionStatus::ChangeRequested.is_terminal());
    }

    #[test]
    fn labels_are_human_readable() {
        assert_eq!(TransactionStatus::ChangeRequested.label(), "Change Requested");
        assert_eq!(TransactionStatus::Approved.label(), "Approved");
    }

    #[test]
    fn transaction_ref_is_dated_and_uppercase() {
        let now = "2026-08-26T10:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let reference = generate_transaction_ref(now);
        assert!(reference.starts_with("TRX-20260826-"));
        assert_eq!(reference.len(), "TRX-20260826-".len() + 6);
        assert_eq!(reference, reference.to_uppercase());
    }
}
