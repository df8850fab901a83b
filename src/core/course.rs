/// Courses and enrollment

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;

use super::error::{DbError, ServiceError, ServiceResult, MSG_COURSE_NOT_FOUND, MSG_USER_NOT_FOUND};
use super::repository::{CourseRepository, CourseUserRepository, UserRepository};
use crate::utils::{check_text_field, TEXT_FIELD_MAX_LEN};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Owning instructor; cleared when that user is deleted
    pub user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub name: String,
    pub description: String,
    pub user_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCourseRequest {
    pub name: String,
    pub description: String,
}

fn validate_fields(name: &str, description: &str) -> Result<(), ServiceError> {
    check_text_field("name", name, TEXT_FIELD_MAX_LEN).map_err(ServiceError::Validation)?;
    check_text_field("description", description, TEXT_FIELD_MAX_LEN).map_err(ServiceError::Validation)
}

#[derive(Clone)]
pub struct CourseService {
    pool: SqlitePool,
}

impl CourseService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: CreateCourseRequest) -> ServiceResult<Course> {
        validate_fields(&request.name, &request.description)?;

        let mut tx = self.pool.begin().await?;
        if UserRepository::find_by_id(&mut tx, request.user_id).await?.is_none() {
            return Err(ServiceError::NotFound(MSG_USER_NOT_FOUND.to_string()));
        }

        let course = CourseRepository::save(&mut tx, &request.name, &request.description, request.user_id)
            .await
            .map_err(|e| match e {
                // user_id is unique: one course per owner
                DbError::Constraint(_) => {
                    ServiceError::Validation("User already owns a course".to_string())
                }
                other => other.into(),
            })?;
        tx.commit().await?;

        info!(course_id = course.id, owner = request.user_id, "course created");
        Ok(course)
    }

    pub async fn find_by_id(&self, id: i64) -> ServiceResult<Course> {
        let mut conn = self.pool.acquire().await?;
        CourseRepository::find_by_id(&mut conn, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(MSG_COURSE_NOT_FOUND.to_string()))
    }

    pub async fn list(&self) -> ServiceResult<Vec<Course>> {
        let mut conn = self.pool.acquire().await?;
        Ok(CourseRepository::find_all(&mut conn).await?)
    }

    pub async fn update(&self, id: i64, request: UpdateCourseRequest) -> ServiceResult<Course> {
        validate_fields(&request.name, &request.description)?;

        let mut tx = self.pool.begin().await?;
        let touched = CourseRepository::update(&mut tx, id, &request.name, &request.description).await?;
        if touched == 0 {
            return Err(ServiceError::NotFound(MSG_COURSE_NOT_FOUND.to_string()));
        }
        let course = CourseRepository::find_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(MSG_COURSE_NOT_FOUND.to_string()))?;
        tx.commit().await?;

        info!(course_id = id, "course updated");
        Ok(course)
    }

    /// Delete a course after its enrollments
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        let mut tx = self.pool.begin().await?;
        if CourseRepository::find_by_id(&mut tx, id).await?.is_none() {
            return Err(ServiceError::NotFound(MSG_COURSE_NOT_FOUND.to_string()));
        }

        let removed = CourseUserRepository::delete_by_course_id(&mut tx, id).await?;
        CourseRepository::delete(&mut tx, id).await?;
        tx.commit().await?;

        info!(course_id = id, enrollments_removed = removed, "course deleted");
        Ok(())
    }

    pub async fn enroll(&self, course_id: i64, user_id: i64) -> ServiceResult<()> {
        let mut tx = self.pool.begin().await?;
        if CourseRepository::find_by_id(&mut tx, course_id).await?.is_none() {
            return Err(ServiceError::NotFound(MSG_COURSE_NOT_FOUND.to_string()));
        }
        if UserRepository::find_by_id(&mut tx, user_id).await?.is_none() {
            return Err(ServiceError::NotFound(MSG_USER_NOT_FOUND.to_string()));
        }

        CourseUserRepository::save(&mut tx, course_id, user_id)
            .await
            .map_err(|e| match e {
                DbError::Constraint(_) => {
                    ServiceError::Validation("User is already enrolled in this course".to_string())
                }
                other => other.into(),
            })?;
        tx.commit().await?;

        info!(course_id, user_id, "user enrolled");
        Ok(())
    }

    /// Ids of users enrolled in a course
    pub async fn members(&self, course_id: i64) -> ServiceResult<Vec<i64>> {
        let mut conn = self.pool.acquire().await?;
        if CourseRepository::find_by_id(&mut conn, course_id).await?.is_none() {
            return Err(ServiceError::NotFound(MSG_COURSE_NOT_FOUND.to_string()));
        }
        Ok(CourseUserRepository::find_user_ids_by_course_id(&mut conn, course_id).await?)
    }
}
