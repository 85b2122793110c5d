use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    error::AppError,
    extract::{AppJson, AppPath, AppQuery},
    state::AppState,
    users::{
        dto::{DeleteParams, UserLogin, UserPublic, UserQuery, UserRegister, UsersPublic},
        services::UserService,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(register).get(list_users))
        .route("/users/search", get(search_user))
        .route("/users/login", post(login))
        .route("/users/:id", patch(update_user).delete(delete_user))
}

#[instrument(skip(users, payload))]
pub async fn register(
    State(users): State<UserService>,
    AppJson(payload): AppJson<UserRegister>,
) -> Result<(StatusCode, Json<UserPublic>), AppError> {
    payload.validate()?;

    // Advisory only; the unique constraints decide under concurrency.
    if users
        .lookup(&UserQuery::by_username(&payload.username), false)
        .await?
        .is_some()
    {
        warn!(username = %payload.username, "username already exists");
        return Err(AppError::Conflict("Username already exists".into()));
    }
    if users
        .lookup(&UserQuery::by_email(&payload.email), false)
        .await?
        .is_some()
    {
        warn!(email = %payload.email, "email already exists");
        return Err(AppError::Conflict("Email already exists".into()));
    }

    let user = users.create(&payload).await?;
    info!(user_id = user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, Json(user.public_view())))
}

#[instrument(skip(users))]
pub async fn list_users(State(users): State<UserService>) -> Result<Json<UsersPublic>, AppError> {
    let users = users.list_active().await?;
    Ok(Json(UsersPublic {
        users: users.iter().map(|u| u.public_view()).collect(),
    }))
}

#[instrument(skip(users))]
pub async fn search_user(
    State(users): State<UserService>,
    AppQuery(query): AppQuery<UserQuery>,
) -> Result<Json<UserPublic>, AppError> {
    let user = users
        .lookup(&query, true)
        .await
        .map_err(|e| match e {
            AppError::InvalidArgument(msg) => AppError::NotFound(msg),
            other => other,
        })?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(Json(user.public_view()))
}

#[instrument(skip(users, payload))]
pub async fn update_user(
    State(users): State<UserService>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UserRegister>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;
    users.update_by_id(id, &payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Deactivates by default; a truthy `?delete` removes the row.
#[instrument(skip(users))]
pub async fn delete_user(
    State(users): State<UserService>,
    AppPath(id): AppPath<i32>,
    AppQuery(params): AppQuery<DeleteParams>,
) -> Result<StatusCode, AppError> {
    if params.delete {
        users.delete_by_id(id).await?;
    } else {
        users.deactivate_by_id(id).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(users, payload))]
pub async fn login(
    State(users): State<UserService>,
    AppJson(payload): AppJson<UserLogin>,
) -> Result<Json<UserPublic>, AppError> {
    let user = users.login(&payload).await.map_err(|e| match e {
        AppError::NotFound(msg) => AppError::InvalidCredentials(msg),
        other => other,
    })?;
    Ok(Json(user.public_view()))
}
