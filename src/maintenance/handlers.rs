use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    db::Database,
    error::{error_response, AppError},
    extract::AppQuery,
    maintenance::dto::{DatabaseTables, DefaultMessage, SetupParams},
    state::AppState,
};

pub fn database_routes() -> Router<AppState> {
    Router::new()
        .route("/database/test-connection", get(test_connection))
        .route(
            "/database/tables",
            get(list_tables).post(setup_tables).delete(drop_tables),
        )
}

#[instrument(skip(db))]
pub async fn test_connection(State(db): State<Arc<Database>>) -> Response {
    if db.probe().await {
        Json(DefaultMessage::new("Connection successful")).into_response()
    } else {
        warn!("connection test failed");
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "database_unavailable",
            "Connection failed".into(),
        )
    }
}

#[instrument(skip(db))]
pub async fn list_tables(
    State(db): State<Arc<Database>>,
) -> Result<Json<DatabaseTables>, AppError> {
    let tables = db.existing_tables().await?;
    Ok(Json(DatabaseTables { tables }))
}

/// Creates missing tables, or drops and recreates them with a truthy `?reset`.
#[instrument(skip(db))]
pub async fn setup_tables(
    State(db): State<Arc<Database>>,
    AppQuery(params): AppQuery<SetupParams>,
) -> Result<(StatusCode, Json<DefaultMessage>), AppError> {
    let message = if params.reset {
        db.reset_schema().await?;
        "Tables reset"
    } else {
        db.create_schema().await?;
        "Tables created"
    };
    info!(reset = params.reset, "{}", message);
    Ok((StatusCode::CREATED, Json(DefaultMessage::new(message))))
}

#[instrument(skip(db))]
pub async fn drop_tables(State(db): State<Arc<Database>>) -> Result<StatusCode, AppError> {
    db.drop_schema().await?;
    Ok(StatusCode::NO_CONTENT)
}
