use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::models::transaction::BankDetails;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTransactionRequest {
    pub sender_id: String,

    #[validate(length(min = 1, message = "Purpose is required"))]
    pub purpose: String,

    #[serde(default)]
    pub description: String,

    pub amount: Decimal,

    #[validate(length(min = 3, max = 3, message = "Currency must be a 3-letter code"))]
    pub currency: String,

    #[validate(length(min = 1, message = "Recipient is required"))]
    pub recipient: String,

    #[serde(default = "default_recipient_type")]
    pub recipient_type: String,

    #[validate(length(min = 1, message = "Recipient department is required"))]
    pub recipient_department: String,

    #[serde(default = "default_payment_method")]
    pub payment_method: String,

    pub bank_details: Option<BankDetails>,
}

fn default_recipient_type() -> String {
    "Company".to_string()
}

fn default_payment_method() -> String {
    "bank_transfer".to_string()
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// Target status: "approved", "rejected" or "change_requested".
    pub status: String,
    /// Acting (approving) user.
    pub user_id: String,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResubmitRequest {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    pub status: Option<String>,
    pub department: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateTransactionRequest {
        serde_json::from_value(serde_json::json!({
            "sender_id": "2",
            "purpose": "Equipment Purchase",
            "amount": "15000",
            "currency": "USD",
            "recipient": "Vendor Co",
            "recipient_department": "IT",
        }))
        .unwrap()
    }

    #[test]
    fn defaults_are_applied() {
        let req = valid_request();
        assert_eq!(req.payment_method, "bank_transfer");
        assert_eq!(req.recipient_type, "Company");
        assert_eq!(req.description, "");
        assert!(req.bank_details.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn empty_purpose_is_rejected() {
        let mut req = valid_request();
        req.purpose = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn currency_must_be_three_letters() {
        let mut req = valid_request();
        req.currency = "ZMWK".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn amount_accepts_decimal_strings() {
        let req: CreateTransactionRequest = serde_json::from_value(serde_json::json!({
            "sender_id": "2",
            "purpose": "Stationery",
            "amount": "1520.75",
            "currency": "ZMW",
            "recipient": "Paper Ltd",
            "recipient_department": "Finance",
        }))
        .unwrap();
        assert_eq!(req.amount.to_string(), "1520.75");
    }
}
