use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection};

use crate::core::error::DbError;
use crate::core::user::{Role, User};

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    email: String,
    name: Option<String>,
    password: Option<String>,
    role: String,
    pending: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DbError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|e: String| DbError::Query(e))?;

        Ok(User {
            id: row.id,
            email: row.email,
            name: row.name.unwrap_or_default(),
            password: row.password.unwrap_or_default(),
            role,
            pending: row.pending,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Fields of a user that has not been stored yet
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    pub pending: bool,
}

const USER_COLUMNS: &str =
    "id, email, name, password, role, pending, created_at, updated_at";

/// Queries on `user_tb`
pub struct UserRepository;

impl UserRepository {
    pub async fn save(conn: &mut SqliteConnection, user: &NewUser) -> Result<User, DbError> {
        let now = Utc::now();
        let row: UserRow = sqlx::query_as(&format!(
            "INSERT INTO user_tb (email, name, password, role, pending, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.pending)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;

        row.try_into()
    }

    pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<User>, DbError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {} FROM user_tb WHERE id = ?", USER_COLUMNS))
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;

        row.map(User::try_from).transpose()
    }

    pub async fn find_by_email(
        conn: &mut SqliteConnection,
        email: &str,
    ) -> Result<Option<User>, DbError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {} FROM user_tb WHERE email = ?", USER_COLUMNS))
                .bind(email)
                .fetch_optional(&mut *conn)
                .await?;

        row.map(User::try_from).transpose()
    }

    pub async fn exists_by_email(conn: &mut SqliteConnection, email: &str) -> Result<bool, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_tb WHERE email = ?")
            .bind(email)
            .fetch_one(&mut *conn)
            .await?;

        Ok(count > 0)
    }

    /// Overwrite email and name; returns the number of rows touched
    pub async fn update(
        conn: &mut SqliteConnection,
        id: i64,
        email: &str,
        name: &str,
    ) -> Result<u64, DbError> {
        let result = sqlx::query(
            "UPDATE user_tb SET email = ?, name = ?, updated_at = ? WHERE id = ?",
        )
        .bind(email)
        .bind(name)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn reset_password(
        conn: &mut SqliteConnection,
        id: i64,
        password_hash: &str,
    ) -> Result<u64, DbError> {
        let result = sqlx::query("UPDATE user_tb SET password = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(Utc::now())
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn update_pending(
        conn: &mut SqliteConnection,
        id: i64,
        pending: bool,
    ) -> Result<u64, DbError> {
        let result = sqlx::query("UPDATE user_tb SET pending = ?, updated_at = ? WHERE id = ?")
            .bind(pending)
            .bind(Utc::now())
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM user_tb WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
