use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::db::{ColumnDef, TableDef};
use crate::error::AppError;
use crate::users::dto::{UserPublic, UserQuery};

pub const USERS_TABLE: &str = "users";
pub(crate) const USERNAME_CONSTRAINT: &str = "uq_users_username";
pub(crate) const EMAIL_CONSTRAINT: &str = "uq_users_email";

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password: String, // plaintext, compared verbatim on login
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl User {
    /// Shape of the `users` table as registered with the gateway.
    pub fn table() -> TableDef {
        TableDef::new(USERS_TABLE)
            .column(ColumnDef::new("id", "SERIAL").primary_key())
            .column(ColumnDef::new("username", "TEXT").not_null())
            .column(ColumnDef::new("email", "TEXT").not_null())
            .column(ColumnDef::new("first_name", "TEXT").not_null())
            .column(ColumnDef::new("last_name", "TEXT").not_null())
            .column(ColumnDef::new("password", "TEXT").not_null())
            .column(ColumnDef::new("is_active", "BOOLEAN").not_null().default_sql("TRUE"))
            .column(ColumnDef::new("created_at", "TIMESTAMPTZ").not_null().default_sql("NOW()"))
            .column(ColumnDef::new("updated_at", "TIMESTAMPTZ").not_null().default_sql("NOW()"))
            .unique(USERNAME_CONSTRAINT, &["username"])
            .unique(EMAIL_CONSTRAINT, &["email"])
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn public_view(&self) -> UserPublic {
        UserPublic {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            full_name: self.full_name(),
        }
    }
}

/// The single identifier a lookup runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserKey {
    Id(i32),
    Username(String),
    Email(String),
}

impl UserKey {
    pub(crate) fn column(&self) -> &'static str {
        match self {
            UserKey::Id(_) => "id",
            UserKey::Username(_) => "username",
            UserKey::Email(_) => "email",
        }
    }
}

impl TryFrom<&UserQuery> for UserKey {
    type Error = AppError;

    fn try_from(query: &UserQuery) -> Result<Self, Self::Error> {
        let username = query.username.as_deref().filter(|s| !s.is_empty());
        let email = query.email.as_deref().filter(|s| !s.is_empty());
        match (query.id, username, email) {
            (Some(id), None, None) => Ok(UserKey::Id(id)),
            (None, Some(username), None) => Ok(UserKey::Username(username.to_string())),
            (None, None, Some(email)) => Ok(UserKey::Email(email.to_string())),
            (None, None, None) => Err(AppError::InvalidArgument(
                "provide at least one unique identifier".into(),
            )),
            _ => Err(AppError::InvalidArgument(
                "provide only one unique identifier".into(),
            )),
        }
    }
}
