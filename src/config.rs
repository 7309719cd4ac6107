// config.rs
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_name: String,
    pub host: String,
    pub port: u16,
    /// Routing table spec, e.g. "Lands:3,Works:7".
    pub approval_routing: String,
    pub seed_demo_users: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        AppConfig {
            database_url: env::var("DATABASE_URL")
                .expect("DATABASE_URL must be set"),
            database_name: env::var("DATABASE_NAME")
                .unwrap_or_else(|_| "govportal".to_string()),
            host: env::var("HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()
                .expect("PORT must be a number"),
            approval_routing: env::var("APPROVAL_ROUTING")
                .unwrap_or_else(|_| "Lands:3".to_string()),
            seed_demo_users: env::var("SEED_DEMO_USERS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
        }
    }

    pub fn get_config_info(&self) -> serde_json::Value {
        serde_json::json!({
            "database_name": self.database_name,
            "approval_routing": self.approval_routing,
            "seed_demo_users": self.seed_demo_users,
            "port": self.port,
            "host": self.host,
        })
    }
}
