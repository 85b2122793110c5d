use std::sync::Arc;

use axum::extract::FromRef;

use crate::{config::AppConfig, db::Database, users};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Connects the one `Database` the process uses; call once at startup.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let db = Database::connect(&config.database).await?;
        Ok(Self::from_parts(Arc::new(db), Arc::new(config)))
    }

    /// Registers the entity tables on `db` and wraps both handles.
    pub fn from_parts(db: Arc<Database>, config: Arc<AppConfig>) -> Self {
        users::register_tables(&db);
        Self { db, config }
    }
}

impl FromRef<AppState> for Arc<Database> {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
