/// Users and the user service
///
/// Registration, lookup, profile update, password reset, approval and
/// deletion. Each operation runs inside one transaction; dependent rows are
/// removed by the ordered `USER_CLEANUP` steps before a user row is deleted.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use super::error::{
    DbError, ServiceError, ServiceResult, MSG_DUPLICATE_EMAIL, MSG_EMAIL_NOT_CONFIRMED,
    MSG_PASSWORD_MISMATCH, MSG_USER_NOT_FOUND,
};
use super::password::PasswordEncoder;
use super::repository::{CourseRepository, CourseUserRepository, NewUser, UserRepository, VmRepository};
use crate::utils::{check_text_field, is_valid_email, EMAIL_MAX_LEN, TEXT_FIELD_MAX_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ROLE_STUDENT")]
    Student,
    #[serde(rename = "ROLE_INSTRUCTOR")]
    Instructor,
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "ROLE_STUDENT",
            Role::Instructor => "ROLE_INSTRUCTOR",
            Role::Admin => "ROLE_ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ROLE_STUDENT" => Ok(Role::Student),
            "ROLE_INSTRUCTOR" => Ok(Role::Instructor),
            "ROLE_ADMIN" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Stored user
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    /// bcrypt hash
    pub password: String,
    pub role: Role,
    /// Instructor awaiting admin approval
    pub pending: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    pub password_conf: String,
    pub role: Role,
    /// Result of a prior availability check; unset means the caller never checked
    #[serde(default)]
    pub email_availability: Option<bool>,
}

impl JoinRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_email(&self.email)?;
        check_text_field("name", &self.name, TEXT_FIELD_MAX_LEN)?;
        validate_password(&self.password, &self.password_conf)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRequest {
    pub email: String,
    pub name: String,
}

impl UpdateRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_email(&self.email)?;
        check_text_field("name", &self.name, TEXT_FIELD_MAX_LEN)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetRequest {
    pub email: String,
    pub password: String,
    pub password_conf: String,
}

/// User as returned to callers (no password hash)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserView {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub pending: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            pending: user.pending,
            created_at: user.created_at,
        }
    }
}

fn validate_email(email: &str) -> Result<(), String> {
    if email.len() > EMAIL_MAX_LEN {
        return Err(format!("email cannot exceed {} characters", EMAIL_MAX_LEN));
    }
    if !is_valid_email(email) {
        return Err(format!("Invalid email: {}", email));
    }
    Ok(())
}

fn validate_password(password: &str, confirmation: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("password cannot be empty".to_string());
    }
    if password != confirmation {
        return Err(MSG_PASSWORD_MISMATCH.to_string());
    }
    Ok(())
}

/// Dependent-record removal executed before a user row is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupStep {
    CourseEnrollments,
    Vms,
    OwnedCourses,
}

/// Order matters: every step removes rows that reference `user_tb`
pub const USER_CLEANUP: &[CleanupStep] = &[
    CleanupStep::CourseEnrollments,
    CleanupStep::Vms,
    CleanupStep::OwnedCourses,
];

impl CleanupStep {
    async fn run(self, conn: &mut SqliteConnection, user_id: i64) -> Result<u64, DbError> {
        match self {
            CleanupStep::CourseEnrollments => CourseUserRepository::delete_by_user_id(conn, user_id).await,
            CleanupStep::Vms => VmRepository::delete_by_user_id(conn, user_id).await,
            CleanupStep::OwnedCourses => CourseRepository::detach_owner(conn, user_id).await,
        }
    }
}

#[derive(Clone)]
pub struct UserService {
    pool: SqlitePool,
    encoder: PasswordEncoder,
}

impl UserService {
    pub fn new(pool: SqlitePool, encoder: PasswordEncoder) -> Self {
        Self { pool, encoder }
    }

    /// Register a new user
    ///
    /// The caller must have confirmed email availability beforehand. The
    /// availability flag is advisory; the unique constraint on `user_tb.email`
    /// is what finally rejects a concurrent duplicate.
    pub async fn register(&self, request: JoinRequest) -> ServiceResult<UserView> {
        match request.email_availability {
            None => return Err(ServiceError::Validation(MSG_EMAIL_NOT_CONFIRMED.to_string())),
            Some(false) => return Err(ServiceError::Validation(MSG_DUPLICATE_EMAIL.to_string())),
            Some(true) => {}
        }
        request.validate().map_err(ServiceError::Validation)?;

        let password_hash = self.encoder.encode(&request.password)?;

        let mut tx = self.pool.begin().await?;

        if UserRepository::exists_by_email(&mut tx, &request.email).await? {
            return Err(ServiceError::Validation(MSG_DUPLICATE_EMAIL.to_string()));
        }

        let new_user = NewUser {
            email: request.email,
            name: request.name,
            password_hash,
            role: request.role,
            pending: request.role == Role::Instructor,
        };
        let user = UserRepository::save(&mut tx, &new_user).await?;

        tx.commit().await?;

        info!(user_id = user.id, role = %user.role, pending = user.pending, "user registered");
        Ok(UserView::from(&user))
    }

    /// `true` when no user has this email yet
    pub async fn check_email_available(&self, email: &str) -> ServiceResult<bool> {
        let mut conn = self.pool.acquire().await?;
        let exists = UserRepository::exists_by_email(&mut conn, email).await?;
        debug!(email, exists, "email availability checked");
        Ok(!exists)
    }

    pub async fn find_by_id(&self, id: i64) -> ServiceResult<UserView> {
        let mut conn = self.pool.acquire().await?;
        let user = UserRepository::find_by_id(&mut conn, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(MSG_USER_NOT_FOUND.to_string()))?;

        Ok(UserView::from(&user))
    }

    /// Overwrite email and name
    pub async fn update(&self, id: i64, request: UpdateRequest) -> ServiceResult<()> {
        request.validate().map_err(ServiceError::Validation)?;

        let mut tx = self.pool.begin().await?;
        let touched = UserRepository::update(&mut tx, id, &request.email, &request.name).await?;
        if touched == 0 {
            return Err(ServiceError::NotFound(MSG_USER_NOT_FOUND.to_string()));
        }
        tx.commit().await?;

        info!(user_id = id, "user updated");
        Ok(())
    }

    pub async fn reset_password(&self, request: ResetRequest) -> ServiceResult<()> {
        let mut tx = self.pool.begin().await?;

        let user = UserRepository::find_by_email(&mut tx, &request.email)
            .await?
            .ok_or_else(|| ServiceError::NotFound(MSG_USER_NOT_FOUND.to_string()))?;

        validate_password(&request.password, &request.password_conf)
            .map_err(ServiceError::Validation)?;

        let password_hash = self.encoder.encode(&request.password)?;
        UserRepository::reset_password(&mut tx, user.id, &password_hash).await?;

        tx.commit().await?;

        info!(user_id = user.id, "password reset");
        Ok(())
    }

    /// Clear the pending flag of an instructor account
    pub async fn approve(&self, id: i64) -> ServiceResult<UserView> {
        let mut tx = self.pool.begin().await?;

        let touched = UserRepository::update_pending(&mut tx, id, false).await?;
        if touched == 0 {
            return Err(ServiceError::NotFound(MSG_USER_NOT_FOUND.to_string()));
        }
        let user = UserRepository::find_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(MSG_USER_NOT_FOUND.to_string()))?;

        tx.commit().await?;

        info!(user_id = id, "user approved");
        Ok(UserView::from(&user))
    }

    /// Delete a user and every row that references it
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        let mut tx = self.pool.begin().await?;

        if UserRepository::find_by_id(&mut tx, id).await?.is_none() {
            return Err(ServiceError::NotFound(MSG_USER_NOT_FOUND.to_string()));
        }

        for step in USER_CLEANUP {
            let removed = step.run(&mut tx, id).await?;
            debug!(user_id = id, ?step, removed, "cleanup step done");
        }
        UserRepository::delete(&mut tx, id).await?;

        tx.commit().await?;

        info!(user_id = id, "user deleted");
        Ok(())
    }
}
