// src/services/routing.rs
//
// Declarative routing for approved transactions: which downstream user gets
// notified, keyed by the transaction's recipient department.

use crate::models::transaction::Transaction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingRule {
    pub department: String,
    pub notify_user_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    rules: Vec<RoutingRule>,
}

/// "Finance Department", "finance" and "Finance " all refer to the same
/// department in the reference data, so match on a normalized form.
fn normalize_department(department: &str) -> String {
    let lowered = department.trim().to_lowercase();
    lowered
        .strip_suffix(" department")
        .unwrap_or(&lowered)
        .to_string()
}

impl RoutingTable {
    /// Parses a spec like "Lands:3,Works:7". Malformed entries are skipped
    /// with a warning rather than failing startup.
    pub fn from_spec(spec: &str) -> Self {
        let mut rules = Vec::new();
        for entry in spec.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            match entry.split_once(':') {
                Some((department, user_id))
                    if !department.trim().is_empty() && !user_id.trim().is_empty() =>
                {
                    rules.push(RoutingRule {
                        department: department.trim().to_string(),
                        notify_user_id: user_id.trim().to_string(),
                    });
                }
                _ => {
                    tracing::warn!("Ignoring malformed APPROVAL_ROUTING entry: '{}'", entry);
                }
            }
        }
        RoutingTable { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Pure function of the transaction's attributes: returns the rules whose
    /// department matches the recipient department.
    pub fn route<'a>(&'a self, transaction: &Transaction) -> Vec<&'a RoutingRule> {
        let target = normalize_department(&transaction.recipient_department);
        self.rules
            .iter()
            .filter(|rule| normalize_department(&rule.department) == target)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::{generate_transaction_ref, TransactionStatus};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn transaction_to(recipient_department: &str) -> Transaction {
        let now = Utc::now();
        Transaction {
            id: None,
            transaction_ref: generate_transaction_ref(now),
            department: "Finance Department".to_string(),
            sender_department: "Finance Department".to_string(),
            sender_id: "2".to_string(),
            recipient: "Vendor Co".to_string(),
            recipient_type: "Company".to_string(),
            recipient_department: recipient_department.to_string(),
            purpose: "Equipment Purchase".to_string(),
            description: String::new(),
            amount: Decimal::new(15000, 0),
            currency: "USD".to_string(),
            payment_method: "bank_transfer".to_string(),
            bank_details: None,
            status: TransactionStatus::Pending,
            change_request_note: None,
            change_requested_at: None,
            change_requested_by: None,
            approved_by: None,
            approved_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn parses_multiple_rules() {
        let table = RoutingTable::from_spec("Lands:3,Works:7");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn skips_malformed_entries() {
        let table = RoutingTable::from_spec("Lands:3,nonsense,:9,Health:");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn routes_on_recipient_department() {
        let table = RoutingTable::from_spec("Lands:3");
        let targets = table.route(&transaction_to("Lands Department"));
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].notify_user_id, "3");
    }

    #[test]
    fn department_matching_ignores_case_and_suffix() {
        let table = RoutingTable::from_spec("Lands Department:3");
        assert_eq!(table.route(&transaction_to("lands")).len(), 1);
        assert_eq!(table.route(&transaction_to("LANDS DEPARTMENT")).len(), 1);
    }

    #[test]
    fn unrouted_departments_get_no_targets() {
        let table = RoutingTable::from_spec("Lands:3");
        assert!(table.route(&transaction_to("IT")).is_empty());
    }
}
