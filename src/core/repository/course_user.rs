use sqlx::SqliteConnection;

use crate::core::error::DbError;

/// Queries on `course_user_tb` (course enrollments)
pub struct CourseUserRepository;

impl CourseUserRepository {
    pub async fn save(
        conn: &mut SqliteConnection,
        course_id: i64,
        user_id: i64,
    ) -> Result<i64, DbError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO course_user_tb (course_id, user_id) VALUES (?, ?) RETURNING id",
        )
        .bind(course_id)
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(id)
    }

    pub async fn count_by_user_id(conn: &mut SqliteConnection, user_id: i64) -> Result<i64, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM course_user_tb WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&mut *conn)
            .await?;

        Ok(count)
    }

    /// User ids enrolled in a course, ordered by enrollment
    pub async fn find_user_ids_by_course_id(
        conn: &mut SqliteConnection,
        course_id: i64,
    ) -> Result<Vec<i64>, DbError> {
        let ids: Vec<i64> =
            sqlx::query_scalar("SELECT user_id FROM course_user_tb WHERE course_id = ? ORDER BY id")
                .bind(course_id)
                .fetch_all(&mut *conn)
                .await?;

        Ok(ids)
    }

    pub async fn delete_by_user_id(conn: &mut SqliteConnection, user_id: i64) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM course_user_tb WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_by_course_id(
        conn: &mut SqliteConnection,
        course_id: i64,
    ) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM course_user_tb WHERE course_id = ?")
            .bind(course_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }
}
