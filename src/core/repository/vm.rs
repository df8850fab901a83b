use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqliteConnection};

use crate::core::error::DbError;

/// VM record owned by a user
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Vm {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Queries on `vm_tb`
pub struct VmRepository;

impl VmRepository {
    pub async fn save(conn: &mut SqliteConnection, user_id: i64, name: &str) -> Result<Vm, DbError> {
        let vm: Vm = sqlx::query_as(
            "INSERT INTO vm_tb (user_id, name, created_at) VALUES (?, ?, ?)
             RETURNING id, user_id, name, created_at",
        )
        .bind(user_id)
        .bind(name)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

        Ok(vm)
    }

    pub async fn find_by_user_id(conn: &mut SqliteConnection, user_id: i64) -> Result<Vec<Vm>, DbError> {
        let vms: Vec<Vm> = sqlx::query_as(
            "SELECT id, user_id, name, created_at FROM vm_tb WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(vms)
    }

    pub async fn delete_by_user_id(conn: &mut SqliteConnection, user_id: i64) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM vm_tb WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }
}
