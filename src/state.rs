use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::Config;
use crate::directory::{Clock, DirectoryStore};

#[derive(Clone)]
pub struct AppState {
    pub store: DirectoryStore,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: DirectoryStore::new(db, clock),
            config: Arc::new(config),
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        self.store.db()
    }
}
