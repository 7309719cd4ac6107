// src/services/approval.rs
//
// The approval engine. Transitions are planned as a pure function of the
// transaction, the acting user and the routing table, then applied as one
// conditional update followed by timeline/activity/notification fan-out.
// The conditional update on {_id, status: "pending"} is also what resolves
// two admins acting on the same transaction: the second one gets a conflict.

use chrono::Utc;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::ReturnDocument,
    Database,
};
use std::sync::Arc;

use crate::errors::{AppError, Result};
use crate::models::datetime;
use crate::models::notification::NotificationKind;
use crate::models::transaction::{Transaction, TransactionStatus};
use crate::models::user::User;
use crate::services::activity::ActivityLog;
use crate::services::fanout::{NotificationDraft, Notifier};
use crate::services::routing::RoutingTable;
use crate::services::store::{self, TransactionStore};
use crate::services::timeline::TimelineService;

/// Everything a transition will write, computed before anything is written.
#[derive(Debug, Clone)]
pub struct TransitionPlan {
    pub new_status: TransactionStatus,
    pub timeline_notes: String,
    pub activity_action: String,
    pub activity_details: String,
    pub visible_to: Vec<String>,
    pub notifications: Vec<NotificationDraft>,
    pub change_note: Option<String>,
}

/// Validates a requested transition and lays out its side effects.
/// No writes happen here; every failure leaves the store untouched.
pub fn plan_transition(
    transaction: &Transaction,
    new_status: TransactionStatus,
    actor: &User,
    note: Option<&str>,
    routing: &RoutingTable,
) -> Result<TransitionPlan> {
    if !actor.capability().can_approve_transactions() {
        return Err(AppError::forbidden(format!(
            "User {} is not permitted to review transactions",
            actor.user_id
        )));
    }

    if new_status == TransactionStatus::Pending {
        return Err(AppError::validation(
            "A transaction cannot be moved back to pending by a reviewer",
        ));
    }

    let note = note.map(str::trim).filter(|n| !n.is_empty());
    if new_status == TransactionStatus::ChangeRequested && note.is_none() {
        return Err(AppError::validation(
            "A note is required when requesting changes",
        ));
    }

    if !transaction.status.accepts_transition() {
        return Err(AppError::conflict(format!(
            "Transaction {} is already {}",
            transaction.transaction_ref,
            transaction.status.label()
        )));
    }

    let timeline_notes = match new_status {
        TransactionStatus::Approved => "Transaction approved for payment".to_string(),
        TransactionStatus::Rejected => "Transaction rejected".to_string(),
        TransactionStatus::ChangeRequested => {
            format!("Changes requested: {}", note.unwrap_or_default())
        }
        TransactionStatus::Pending => unreachable!("rejected above"),
    };

    let action_verb = match new_status {
        TransactionStatus::Approved => "Approved transaction",
        TransactionStatus::Rejected => "Rejected transaction",
        TransactionStatus::ChangeRequested => "Requested changes to transaction",
        TransactionStatus::Pending => unreachable!("rejected above"),
    };
    let activity_action = format!("{} {}", action_verb, transaction.transaction_ref);

    let mut activity_details = format!(
        "Transaction from {} to {} for {} {}",
        transaction.department,
        transaction.recipient_department,
        transaction.currency,
        transaction.amount
    );
    if let Some(note) = note {
        activity_details.push_str(&format!("\n\nRequested Changes: {}", note));
    }

    // Visible to the reviewer and the transaction's sender.
    let mut visible_to = vec![actor.user_id.clone()];
    if transaction.sender_id != actor.user_id {
        visible_to.push(transaction.sender_id.clone());
    }

    let related_id = transaction.id.map(|id| id.to_hex());

    let (title, description, kind) = match new_status {
        TransactionStatus::Approved => (
            "Transaction Approved",
            format!(
                "Your transaction {} has been approved",
                transaction.transaction_ref
            ),
            NotificationKind::Success,
        ),
        TransactionStatus::Rejected => (
            "Transaction Rejected",
            format!(
                "Your transaction {} has been rejected",
                transaction.transaction_ref
            ),
            NotificationKind::Error,
        ),
        TransactionStatus::ChangeRequested => (
            "Changes Requested for Transaction",
            format!(
                "Changes have been requested for your transaction {}",
                transaction.transaction_ref
            ),
            NotificationKind::Warning,
        ),
        TransactionStatus::Pending => unreachable!("rejected above"),
    };

    let mut notifications = vec![NotificationDraft {
        user_id: transaction.sender_id.clone(),
        title: title.to_string(),
        description,
        details: note
            .map(|n| format!("Requested Changes: {}", n))
            .unwrap_or_default(),
        kind,
        related_type: Some("transaction".to_string()),
        related_id: related_id.clone(),
    }];

    // Downstream routing applies to approvals only.
    if new_status == TransactionStatus::Approved {
        for rule in routing.route(transaction) {
            notifications.push(NotificationDraft {
                user_id: rule.notify_user_id.clone(),
                title: "New Approved Transaction".to_string(),
                description: format!(
                    "A transaction from {} has been approved",
                    transaction.department
                ),
                details: format!(
                    "Transaction Reference: {}\nAmount: {} {}\nPurpose: {}\nStatus: Approved",
                    transaction.transaction_ref,
                    transaction.currency,
                    transaction.amount,
                    transaction.purpose
                ),
                kind: NotificationKind::Info,
                related_type: Some("transaction".to_string()),
                related_id: related_id.clone(),
            });
        }
    }

    Ok(TransitionPlan {
        new_status,
        timeline_notes,
        activity_action,
        activity_details,
        visible_to,
        notifications,
        change_note: note.map(str::to_string),
    })
}

/// Department stamped on the sender's resubmission timeline entry. Falls
/// back to the department recorded on the transaction when the user record
/// is missing; a failed lookup is logged rather than silently treated the
/// same way.
fn sender_department(
    lookup: Result<Option<User>>,
    transaction: &Transaction,
    user_id: &str,
) -> String {
    match lookup {
        Ok(Some(user)) => user.department,
        Ok(None) => transaction.sender_department.clone(),
        Err(e) => {
            tracing::warn!(
                "Failed to load sender {} while resubmitting {}: {}",
                user_id,
                transaction.transaction_ref,
                e
            );
            transaction.sender_department.clone()
        }
    }
}

#[derive(Clone)]
pub struct ApprovalEngine {
    db: Database,
    store: TransactionStore,
    timeline: TimelineService,
    activity: ActivityLog,
    notifier: Notifier,
    routing: Arc<RoutingTable>,
}

impl ApprovalEngine {
    pub fn new(db: Database, routing: Arc<RoutingTable>) -> Self {
        ApprovalEngine {
            store: TransactionStore::new(db.clone()),
            timeline: TimelineService::new(db.clone()),
            activity: ActivityLog::new(db.clone()),
            notifier: Notifier::new(db.clone()),
            db,
            routing,
        }
    }

    async fn load_actor(&self, user_id: &str) -> Result<User> {
        store::find_user_by_user_id(&self.db, user_id)
            .await?
            .ok_or_else(|| AppError::forbidden(format!("Unknown acting user {}", user_id)))
    }

    /// Applies a reviewer transition: validates, conditionally updates the
    /// record, appends the timeline entry, then fans out activity and
    /// notifications best-effort.
    pub async fn apply_transition(
        &self,
        transaction_id: &str,
        status: &str,
        acting_user_id: &str,
        note: Option<&str>,
    ) -> Result<Transaction> {
        let oid = ObjectId::parse_str(transaction_id)?;
        let transaction = self.store.get(oid).await?;
        let actor = self.load_actor(acting_user_id).await?;
        let new_status: TransactionStatus = status.parse().map_err(AppError::validation)?;

        let plan = plan_transition(&transaction, new_status, &actor, note, &self.routing)?;

        let now_str = datetime::to_string(&Utc::now());
        let mut set = doc! {
            "status": plan.new_status.as_str(),
            "updated_at": now_str.as_str(),
        };
        match plan.new_status {
            TransactionStatus::Approved => {
                set.insert("approved_by", actor.user_id.as_str());
                set.insert("approved_at", now_str.as_str());
            }
            TransactionStatus::ChangeRequested => {
                set.insert("change_request_note", plan.change_note.as_deref().unwrap_or_default());
                set.insert("change_requested_at", now_str.as_str());
                set.insert("change_requested_by", actor.user_id.as_str());
            }
            _ => {}
        }

        // Guarded update: only a still-pending record is transitioned. A
        // concurrent reviewer loses this race and observes a conflict.
        let updated = self
            .store
            .collection()
            .find_one_and_update(
                doc! { "_id": oid, "status": TransactionStatus::Pending.as_str() },
                doc! { "$set": set },
            )
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| {
                AppError::conflict(format!(
                    "Transaction {} was already reviewed",
                    transaction.transaction_ref
                ))
            })?;

        self.timeline
            .append(
                &oid.to_hex(),
                plan.new_status.label(),
                &actor.user_id,
                &actor.department,
                &plan.timeline_notes,
            )
            .await?;

        self.activity
            .record_best_effort(
                &actor.user_id,
                &plan.activity_action,
                &plan.activity_details,
                plan.visible_to.clone(),
            )
            .await;

        for draft in plan.notifications {
            self.notifier.notify_best_effort(draft).await;
        }

        tracing::info!(
            "✅ Transaction {} moved to {} by user {}",
            updated.transaction_ref,
            plan.new_status,
            actor.user_id
        );

        Ok(updated)
    }

    /// Sender resubmission of a change-requested transaction. Returns the
    /// record to pending so it re-enters the same approval gate; nothing is
    /// resubmitted automatically.
    pub async fn resubmit(&self, transaction_id: &str, acting_user_id: &str) -> Result<Transaction> {
        let oid = ObjectId::parse_str(transaction_id)?;
        let transaction = self.store.get(oid).await?;

        if transaction.sender_id != acting_user_id {
            return Err(AppError::forbidden(
                "Only the sender can resubmit a transaction",
            ));
        }

        if transaction.status != TransactionStatus::ChangeRequested {
            return Err(AppError::conflict(format!(
                "Transaction {} is {}, not awaiting changes",
                transaction.transaction_ref,
                transaction.status.label()
            )));
        }

        let lookup = store::find_user_by_user_id(&self.db, acting_user_id).await;
        let department = sender_department(lookup, &transaction, acting_user_id);

        let now_str = datetime::to_string(&Utc::now());
        let updated = self
            .store
            .collection()
            .find_one_and_update(
                doc! { "_id": oid, "status": TransactionStatus::ChangeRequested.as_str() },
                doc! {
                    "$set": {
                        "status": TransactionStatus::Pending.as_str(),
                        "updated_at": now_str.as_str(),
                    },
                    "$unset": {
                        "change_request_note": "",
                        "change_requested_at": "",
                        "change_requested_by": "",
                    },
                },
            )
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| {
                AppError::conflict(format!(
                    "Transaction {} changed while resubmitting",
                    transaction.transaction_ref
                ))
            })?;

        self.timeline
            .append(
                &oid.to_hex(),
                "Resubmitted",
                acting_user_id,
                &department,
                "Transaction revised and resubmitted for approval",
            )
            .await?;

        self.activity
            .record_best_effort(
                acting_user_id,
                &format!("Resubmitted transaction {}", updated.transaction_ref),
                &format!(
                    "Transaction from {} to {} returned for approval",
                    updated.department, updated.recipient_department
                ),
                vec![acting_user_id.to_string()],
            )
            .await;

        tracing::info!(
            "🔁 Transaction {} resubmitted by sender {}",
            updated.transaction_ref,
            acting_user_id
        );

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::generate_transaction_ref;
    use crate::models::user::Role;
    use rust_decimal::Decimal;

    fn admin() -> User {
        User {
            id: None,
            user_id: "1".to_string(),
            name: "David Administrator".to_string(),
            email: "admin@example.com".to_string(),
            department: "IT Department".to_string(),
            role: Role::Admin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn clerk() -> User {
        User {
            user_id: "2".to_string(),
            name: "John Financial".to_string(),
            email: "finance@example.com".to_string(),
            department: "Finance Department".to_string(),
            role: Role::User,
            ..admin()
        }
    }

    fn pending_transaction(recipient_department: &str) -> Transaction {
        let now = Utc::now();
        Transaction {
            id: Some(ObjectId::new()),
            transaction_ref: generate_transaction_ref(now),
            department: "Finance Department".to_string(),
            sender_department: "Finance Department".to_string(),
            sender_id: "2".to_string(),
            recipient: "Vendor Co".to_string(),
            recipient_type: "Company".to_string(),
            recipient_department: recipient_department.to_string(),
            purpose: "Equipment Purchase".to_string(),
            description: "Purchase of new equipment".to_string(),
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

    fn routing() -> RoutingTable {
        RoutingTable::from_spec("Lands:3")
    }

    #[test]
    fn approving_plans_one_timeline_one_activity_one_sender_notification() {
        let tx = pending_transaction("IT");
        let plan =
            plan_transition(&tx, TransactionStatus::Approved, &admin(), None, &routing()).unwrap();

        assert_eq!(plan.new_status, TransactionStatus::Approved);
        assert_eq!(plan.timeline_notes, "Transaction approved for payment");
        assert_eq!(
            plan.activity_action,
            format!("Approved transaction {}", tx.transaction_ref)
        );
        assert_eq!(plan.visible_to, vec!["1".to_string(), "2".to_string()]);

        // IT is not a routed department: exactly one notification, to the
        // sender, titled "Transaction Approved".
        assert_eq!(plan.notifications.len(), 1);
        let sender_note = &plan.notifications[0];
        assert_eq!(sender_note.user_id, "2");
        assert_eq!(sender_note.title, "Transaction Approved");
        assert_eq!(sender_note.kind, NotificationKind::Success);
        assert_eq!(sender_note.related_type.as_deref(), Some("transaction"));
    }

    #[test]
    fn approving_a_routed_department_adds_a_downstream_notification() {
        let tx = pending_transaction("Lands Department");
        let plan =
            plan_transition(&tx, TransactionStatus::Approved, &admin(), None, &routing()).unwrap();

        assert_eq!(plan.notifications.len(), 2);
        let routed = &plan.notifications[1];
        assert_eq!(routed.user_id, "3");
        assert_eq!(routed.title, "New Approved Transaction");
        assert_eq!(routed.kind, NotificationKind::Info);
        assert!(routed.details.contains(&tx.transaction_ref));
        assert!(routed.details.contains("Purpose: Equipment Purchase"));
    }

    #[test]
    fn rejection_plans_an_error_notification() {
        let tx = pending_transaction("Lands Department");
        let plan =
            plan_transition(&tx, TransactionStatus::Rejected, &admin(), None, &routing()).unwrap();

        // Routing applies to approvals only.
        assert_eq!(plan.notifications.len(), 1);
        assert_eq!(plan.notifications[0].title, "Transaction Rejected");
        assert_eq!(plan.notifications[0].kind, NotificationKind::Error);
        assert_eq!(plan.timeline_notes, "Transaction rejected");
    }

    #[test]
    fn change_request_without_note_is_rejected_with_no_plan() {
        let tx = pending_transaction("IT");
        for note in [None, Some(""), Some("   ")] {
            let err = plan_transition(
                &tx,
                TransactionStatus::ChangeRequested,
                &admin(),
                note,
                &routing(),
            )
            .unwrap_err();
            assert!(matches!(err, AppError::ValidationError(_)));
        }
    }

    #[test]
    fn change_request_note_flows_into_every_sink() {
        let tx = pending_transaction("IT");
        let plan = plan_transition(
            &tx,
            TransactionStatus::ChangeRequested,
            &admin(),
            Some("Attach three quotations"),
            &routing(),
        )
        .unwrap();

        assert_eq!(plan.change_note.as_deref(), Some("Attach three quotations"));
        assert_eq!(plan.timeline_notes, "Changes requested: Attach three quotations");
        assert!(plan
            .activity_details
            .contains("Requested Changes: Attach three quotations"));
        assert_eq!(plan.notifications.len(), 1);
        assert_eq!(plan.notifications[0].title, "Changes Requested for Transaction");
        assert_eq!(plan.notifications[0].kind, NotificationKind::Warning);
        assert_eq!(
            plan.notifications[0].details,
            "Requested Changes: Attach three quotations"
        );
    }

    #[test]
    fn non_admin_actors_are_forbidden() {
        let tx = pending_transaction("IT");
        let err = plan_transition(&tx, TransactionStatus::Approved, &clerk(), None, &routing())
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn terminal_transactions_conflict() {
        for status in [TransactionStatus::Approved, TransactionStatus::Rejected] {
            let mut tx = pending_transaction("IT");
            tx.status = status;
            let err = plan_transition(&tx, TransactionStatus::Rejected, &admin(), None, &routing())
                .unwrap_err();
            assert!(matches!(err, AppError::Conflict(_)));
        }
    }

    #[test]
    fn change_requested_transactions_cannot_be_reviewed_again() {
        // The sender has to resubmit first; reviewing a change_requested
        // record directly is a conflict, not a validation error.
        let mut tx = pending_transaction("IT");
        tx.status = TransactionStatus::ChangeRequested;
        let err = plan_transition(&tx, TransactionStatus::Approved, &admin(), None, &routing())
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn moving_back_to_pending_is_invalid() {
        let tx = pending_transaction("IT");
        let err = plan_transition(&tx, TransactionStatus::Pending, &admin(), None, &routing())
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn resubmission_department_comes_from_the_user_record() {
        let tx = pending_transaction("IT");
        let dept = sender_department(Ok(Some(clerk())), &tx, "2");
        assert_eq!(dept, "Finance Department");
    }

    #[test]
    fn resubmission_department_falls_back_when_user_is_missing() {
        let mut tx = pending_transaction("IT");
        tx.sender_department = "Health Department".to_string();
        assert_eq!(sender_department(Ok(None), &tx, "2"), "Health Department");
    }

    #[test]
    fn resubmission_department_falls_back_on_lookup_failure() {
        let mut tx = pending_transaction("IT");
        tx.sender_department = "Health Department".to_string();
        let failed: crate::errors::Result<Option<User>> =
            Err(AppError::validation("storage unavailable"));
        assert_eq!(sender_department(failed, &tx, "2"), "Health Department");
    }

    #[test]
    fn self_review_does_not_duplicate_visibility() {
        let mut tx = pending_transaction("IT");
        tx.sender_id = "1".to_string();
        let plan =
            plan_transition(&tx, TransactionStatus::Approved, &admin(), None, &routing()).unwrap();
        assert_eq!(plan.visible_to, vec!["1".to_string()]);
    }
}
