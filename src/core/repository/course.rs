use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection};

use crate::core::course::Course;
use crate::core::error::DbError;

#[derive(Debug, FromRow)]
struct CourseRow {
    id: i64,
    name: String,
    description: String,
    user_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        Course {
            id: row.id,
            name: row.name,
            description: row.description,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const COURSE_COLUMNS: &str = "id, name, description, user_id, created_at, updated_at";

/// Queries on `course_tb`
pub struct CourseRepository;

impl CourseRepository {
    pub async fn save(
        conn: &mut SqliteConnection,
        name: &str,
        description: &str,
        user_id: i64,
    ) -> Result<Course, DbError> {
        let now = Utc::now();
        let row: CourseRow = sqlx::query_as(&format!(
            "INSERT INTO course_tb (name, description, user_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING {}",
            COURSE_COLUMNS
        ))
        .bind(name)
        .bind(description)
        .bind(user_id)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;

        Ok(row.into())
    }

    pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Course>, DbError> {
        let row: Option<CourseRow> =
            sqlx::query_as(&format!("SELECT {} FROM course_tb WHERE id = ?", COURSE_COLUMNS))
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;

        Ok(row.map(Course::from))
    }

    pub async fn find_all(conn: &mut SqliteConnection) -> Result<Vec<Course>, DbError> {
        let rows: Vec<CourseRow> =
            sqlx::query_as(&format!("SELECT {} FROM course_tb ORDER BY id", COURSE_COLUMNS))
                .fetch_all(&mut *conn)
                .await?;

        Ok(rows.into_iter().map(Course::from).collect())
    }

    pub async fn update(
        conn: &mut SqliteConnection,
        id: i64,
        name: &str,
        description: &str,
    ) -> Result<u64, DbError> {
        let result = sqlx::query(
            "UPDATE course_tb SET name = ?, description = ?, updated_at = ? WHERE id = ?",
        )
        .bind(name)
        .bind(description)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Clear the owner of every course owned by `user_id`
    pub async fn detach_owner(conn: &mut SqliteConnection, user_id: i64) -> Result<u64, DbError> {
        let result = sqlx::query("UPDATE course_tb SET user_id = NULL, updated_at = ? WHERE user_id = ?")
            .bind(Utc::now())
            .bind(user_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM course_tb WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
