use mongodb::Database;
use std::sync::Arc;

use crate::services::approval::ApprovalEngine;
use crate::services::routing::RoutingTable;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub routing: Arc<RoutingTable>,
}

impl AppState {
    pub fn new(db: Database, routing: RoutingTable) -> Self {
        AppState {
            db,
            routing: Arc::new(routing),
        }
    }

    pub fn approval_engine(&self) -> ApprovalEngine {
        ApprovalEngine::new(self.db.clone(), self.routing.clone())
    }
}
