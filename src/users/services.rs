use std::sync::Arc;

use axum::extract::FromRef;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::{
    db::{Database, Session},
    error::AppError,
    state::AppState,
    users::{
        dto::{UserLogin, UserQuery, UserRegister},
        repo_types::{User, UserKey, EMAIL_CONSTRAINT, USERNAME_CONSTRAINT},
    },
};

/// User operations. Holds no state of its own; every call borrows a session
/// from the shared gateway and releases it before returning.
#[derive(Clone)]
pub struct UserService {
    db: Arc<Database>,
}

impl FromRef<AppState> for UserService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.db.clone())
    }
}

impl UserService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn lookup(
        &self,
        query: &UserQuery,
        require_existing: bool,
    ) -> Result<Option<User>, AppError> {
        let key = UserKey::try_from(query)?;
        let mut session = self.db.session().await?;
        Self::lookup_with(&mut session, &key, require_existing).await
    }

    /// Same as `lookup`, on a session owned by the caller.
    pub async fn lookup_with(
        session: &mut Session,
        key: &UserKey,
        require_existing: bool,
    ) -> Result<Option<User>, AppError> {
        let user = User::find_active(session.conn(), key).await?;
        if user.is_none() && require_existing {
            return Err(not_found());
        }
        Ok(user)
    }

    #[instrument(skip(self, registration), fields(username = %registration.username))]
    pub async fn create(&self, registration: &UserRegister) -> Result<User, AppError> {
        let mut session = self.db.session().await?;
        let user = User::insert(session.conn(), registration, OffsetDateTime::now_utc())
            .await
            .map_err(conflict_or_unavailable)?;
        session.commit().await?;
        info!(user_id = user.id, "user created");
        Ok(user)
    }

    pub async fn list_active(&self) -> Result<Vec<User>, AppError> {
        let mut session = self.db.session().await?;
        let users = User::list_active(session.conn()).await?;
        Ok(users)
    }

    #[instrument(skip(self, changes))]
    pub async fn update_by_id(&self, id: i32, changes: &UserRegister) -> Result<User, AppError> {
        let mut session = self.db.session().await?;
        require_active(&mut session, id).await?;
        let user = User::overwrite(session.conn(), id, changes, OffsetDateTime::now_utc())
            .await
            .map_err(conflict_or_unavailable)?;
        session.commit().await?;
        info!(user_id = id, "user updated");
        Ok(user)
    }

    /// Soft delete: the row stays, lookups stop matching it.
    #[instrument(skip(self))]
    pub async fn deactivate_by_id(&self, id: i32) -> Result<(), AppError> {
        let mut session = self.db.session().await?;
        require_active(&mut session, id).await?;
        User::deactivate(session.conn(), id, OffsetDateTime::now_utc()).await?;
        session.commit().await?;
        info!(user_id = id, "user deactivated");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_by_id(&self, id: i32) -> Result<(), AppError> {
        let mut session = self.db.session().await?;
        require_active(&mut session, id).await?;
        User::delete(session.conn(), id).await?;
        session.commit().await?;
        info!(user_id = id, "user deleted");
        Ok(())
    }

    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &UserLogin) -> Result<User, AppError> {
        let mut session = self.db.session().await?;
        let key = UserKey::Username(credentials.username.clone());
        let user = Self::lookup_with(&mut session, &key, true)
            .await?
            .ok_or_else(not_found)?;
        if user.password != credentials.password {
            warn!(user_id = user.id, "login invalid password");
            return Err(AppError::InvalidCredentials("Invalid credentials".into()));
        }
        info!(user_id = user.id, "user logged in");
        Ok(user)
    }
}

async fn require_active(session: &mut Session, id: i32) -> Result<User, AppError> {
    UserService::lookup_with(session, &UserKey::Id(id), true)
        .await?
        .ok_or_else(not_found)
}

fn not_found() -> AppError {
    AppError::NotFound("User not found".into())
}

/// Unique violations are the authoritative duplicate signal; the handler's
/// pre-check can race with a concurrent insert.
fn conflict_or_unavailable(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            let message = match db_err.constraint() {
                Some(USERNAME_CONSTRAINT) => "Username already exists",
                Some(EMAIL_CONSTRAINT) => "Email already exists",
                _ => "User already exists",
            };
            warn!(constraint = ?db_err.constraint(), "unique violation");
            return AppError::Conflict(message.into());
        }
    }
    AppError::from(e)
}
