use sqlx::PgConnection;
use time::OffsetDateTime;

use crate::users::dto::UserRegister;
use crate::users::repo_types::{User, UserKey};

const USER_COLUMNS: &str =
    "id, username, email, first_name, last_name, password, is_active, created_at, updated_at";

impl User {
    /// Find an active user by one identifier.
    pub async fn find_active(
        conn: &mut PgConnection,
        key: &UserKey,
    ) -> Result<Option<User>, sqlx::Error> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE {} = $1 AND is_active = TRUE",
            key.column()
        );
        let query = sqlx::query_as::<_, User>(&sql);
        let query = match key {
            UserKey::Id(id) => query.bind(*id),
            UserKey::Username(username) => query.bind(username.as_str()),
            UserKey::Email(email) => query.bind(email.as_str()),
        };
        query.fetch_optional(conn).await
    }

    pub async fn list_active(conn: &mut PgConnection) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE is_active = TRUE ORDER BY id"
        ))
        .fetch_all(conn)
        .await
    }

    /// Insert a new active user; both timestamps are set to `now`.
    pub async fn insert(
        conn: &mut PgConnection,
        new: &UserRegister,
        now: OffsetDateTime,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, first_name, last_name, password, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, TRUE, $6, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.password)
        .bind(now)
        .fetch_one(conn)
        .await
    }

    /// Overwrite every mutable field of the user `id`.
    pub async fn overwrite(
        conn: &mut PgConnection,
        id: i32,
        changes: &UserRegister,
        now: OffsetDateTime,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET username = $2, email = $3, first_name = $4, last_name = $5, password = $6, updated_at = $7
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.username)
        .bind(&changes.email)
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.password)
        .bind(now)
        .fetch_one(conn)
        .await
    }

    pub async fn deactivate(
        conn: &mut PgConnection,
        id: i32,
        now: OffsetDateTime,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET is_active = FALSE, updated_at = $2 WHERE id = $1")
            .bind(id)
            .bind(now)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn delete(conn: &mut PgConnection, id: i32) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }
}
