// src/services/store.rs
//
// Authoritative transaction persistence. This replaces the reference
// dashboard's localStorage fallback: MongoDB is the only source of truth.

use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Collection, Database,
};

use crate::errors::{AppError, Result};
use crate::models::transaction::Transaction;
use crate::models::user::User;

pub const TRANSACTIONS_COLLECTION: &str = "transactions";
pub const USERS_COLLECTION: &str = "users";

#[derive(Clone)]
pub struct TransactionStore {
    db: Database,
}

impl TransactionStore {
    pub fn new(db: Database) -> Self {
        TransactionStore { db }
    }

    pub fn collection(&self) -> Collection<Transaction> {
        self.db.collection(TRANSACTIONS_COLLECTION)
    }

    pub async fn insert(&self, mut transaction: Transaction) -> Result<Transaction> {
        let inserted = self.collection().insert_one(&transaction).await?;
        transaction.id = inserted.inserted_id.as_object_id();
        Ok(transaction)
    }

    pub async fn get(&self, id: ObjectId) -> Result<Transaction> {
        self.collection()
            .find_one(doc! { "_id": id })
            .await?
            .ok_or_else(|| AppError::not_found(format!("Transaction {} not found", id.to_hex())))
    }

    /// Filtered listing, newest first. A department of "all" or "admin" is
    /// a no-op; otherwise the department matches when it appears as owning,
    /// sending or routing department on the record.
    pub async fn list(
        &self,
        status: Option<&str>,
        department: Option<&str>,
    ) -> Result<Vec<Transaction>> {
        let mut filter = doc! {};

        if let Some(status) = status {
            // Reject typos up front instead of silently returning nothing.
            let parsed: crate::models::transaction::TransactionStatus = status
                .parse()
                .map_err(AppError::validation)?;
            filter.insert("status", parsed.as_str());
        }

        if let Some(department) = department {
            if department != "all" && department != "admin" {
                filter.insert(
                    "$or",
                    vec![
                        doc! { "department": department },
                        doc! { "sender_department": department },
                        doc! { "recipient_department": department },
                    ],
                );
            }
        }

        let cursor = self
            .collection()
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .await?;
        let transactions: Vec<Transaction> = cursor.try_collect().await?;
        Ok(transactions)
    }
}

/// Looks up a user by application-level id ("1", "2", ...), not ObjectId.
pub async fn find_user_by_user_id(db: &Database, user_id: &str) -> Result<Option<User>> {
    let collection: Collection<User> = db.collection(USERS_COLLECTION);
    let user = collection.find_one(doc! { "user_id": user_id }).await?;
    Ok(user)
}
