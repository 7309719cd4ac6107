use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Stable application-level id, referenced by transactions,
    /// notifications and activity entries.
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub department: String,
    pub role: Role,

    #[serde(with = "crate::models::datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::models::datetime")]
    pub updated_at: DateTime<Utc>,
}

/// What an actor is allowed to do, decided once at the API boundary rather
/// than re-checking role strings inside the workflow.
#[derive(Debug, Clone, Copy)]
pub struct Capability {
    can_approve: bool,
}

impl Capability {
    pub fn can_approve_transactions(&self) -> bool {
        self.can_approve
    }
}

impl User {
    pub fn capability(&self) -> Capability {
        Capability {
            can_approve: self.role == Role::Admin || self.department.eq_ignore_ascii_case("admin"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role, department: &str) -> User {
        User {
            id: None,
            user_id: "1".to_string(),
            name: "David Administrator".to_string(),
            email: "admin@example.com".to_string(),
            department: department.to_string(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn admin_role_grants_approval() {
        assert!(user(Role::Admin, "IT Department")
            .capability()
            .can_approve_transactions());
    }

    #[test]
    fn admin_department_grants_approval() {
        assert!(user(Role::User, "Admin")
            .capability()
            .can_approve_transactions());
        assert!(user(Role::User, "admin")
            .capability()
            .can_approve_transactions());
    }

    #[test]
    fn plain_users_cannot_approve() {
        assert!(!user(Role::User, "Finance Department")
            .capability()
            .can_approve_transactions());
    }
}
