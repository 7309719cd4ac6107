// src/database/seed.rs
//
// Upserts the demo users the portal ships with so that capability lookups
// and the default Lands routing rule work out of the box. Credentials are
// not stored here; authentication is handled outside this service.

use chrono::Utc;
use mongodb::bson::doc;
use mongodb::{Collection, Database};

use crate::errors::Result;
use crate::models::datetime;
use crate::models::user::{Role, User};
use crate::services::store::USERS_COLLECTION;

struct DemoUser {
    user_id: &'static str,
    name: &'static str,
    email: &'static str,
    department: &'static str,
    role: Role,
}

const DEMO_USERS: &[DemoUser] = &[
    DemoUser {
        user_id: "1",
        name: "David Administrator",
        email: "admin@example.com",
        department: "IT Department",
        role: Role::Admin,
    },
    DemoUser {
        user_id: "2",
        name: "John Financial",
        email: "finance@example.com",
        department: "Finance Department",
        role: Role::User,
    },
    DemoUser {
        user_id: "3",
        name: "Mary Surveyor",
        email: "lands@example.com",
        department: "Lands Department",
        role: Role::User,
    },
    DemoUser {
        user_id: "4",
        name: "Sarah Medical",
        email: "health@example.com",
        department: "Health Department",
        role: Role::User,
    },
];

pub async fn seed_demo_users(db: &Database) -> Result<()> {
    let collection: Collection<User> = db.collection(USERS_COLLECTION);
    let now = datetime::to_string(&Utc::now());
    let mut seeded = 0;

    for demo in DEMO_USERS {
        let role = match demo.role {
            Role::Admin => "admin",
            Role::User => "user",
        };
        let result = collection
            .update_one(
                doc! { "user_id": demo.user_id },
                doc! {
                    "$set": {
                        "name": demo.name,
                        "email": demo.email,
                        "department": demo.department,
                        "role": role,
                        "updated_at": now.as_str(),
                    },
                    "$setOnInsert": {
                        "created_at": now.as_str(),
                    },
                },
            )
            .upsert(true)
            .await?;

        if result.upserted_id.is_some() {
            seeded += 1;
        }
    }

    tracing::info!("👤 Demo users ready ({} newly seeded)", seeded);
    Ok(())
}
