/// API Request Handlers
/// Thin adapters from HTTP onto the user, course and metrics services

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use super::AppState;
use crate::core::course::{Course, CreateCourseRequest, UpdateCourseRequest};
use crate::core::user::{JoinRequest, ResetRequest, UpdateRequest, UserView};
use crate::core::{MetricDataResponse, MetricsError, ServiceError};
use crate::utils::METRICS;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(msg: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg),
        }
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct EmailAvailability {
    pub email: String,
    pub available: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Deleted {
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Enrollment {
    pub course_id: i64,
    pub user_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MetricInfo {
    pub name: String,
    pub query_id: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub metrics_enabled: bool,
}

#[derive(Deserialize)]
pub struct EmailQuery {
    email: String,
}

#[derive(Deserialize)]
pub struct MetricParams {
    #[serde(default)]
    query_id: Option<String>,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Metrics(#[from] MetricsError),

    #[error("Metrics are not configured on this server")]
    MetricsDisabled,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Service(ServiceError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Service(ServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Metrics(MetricsError::UnknownMetric(_)) => StatusCode::BAD_REQUEST,
            ApiError::Metrics(MetricsError::Remote(_) | MetricsError::MalformedResponse(_)) => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::Metrics(MetricsError::Config(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MetricsDisabled => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            if status.is_server_error() {
                warn!(error = %self, "upstream failure");
            }
            self.to_string()
        };

        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

// ============================================================================
// User Handlers
// ============================================================================

pub async fn join(
    State(state): State<AppState>,
    Json(request): Json<JoinRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserView>>), ApiError> {
    let user = state.users.register(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user))))
}

pub async fn check_email(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> ApiResult<EmailAvailability> {
    let available = state.users.check_email_available(&query.email).await?;
    Ok(Json(ApiResponse::ok(EmailAvailability {
        email: query.email,
        available,
    })))
}

pub async fn get_user(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<UserView> {
    let user = state.users.find_by_id(id).await?;
    Ok(Json(ApiResponse::ok(user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateRequest>,
) -> ApiResult<UserView> {
    state.users.update(id, request).await?;
    let user = state.users.find_by_id(id).await?;
    Ok(Json(ApiResponse::ok(user)))
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetRequest>,
) -> ApiResult<String> {
    state.users.reset_password(request).await?;
    Ok(Json(ApiResponse::ok("Password has been reset".to_string())))
}

pub async fn delete_user(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Deleted> {
    state.users.delete(id).await?;
    Ok(Json(ApiResponse::ok(Deleted { id })))
}

pub async fn approve_user(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<UserView> {
    let user = state.users.approve(id).await?;
    Ok(Json(ApiResponse::ok(user)))
}

// ============================================================================
// Course Handlers
// ============================================================================

pub async fn list_courses(State(state): State<AppState>) -> ApiResult<Vec<Course>> {
    let courses = state.courses.list().await?;
    Ok(Json(ApiResponse::ok(courses)))
}

pub async fn create_course(
    State(state): State<AppState>,
    Json(request): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Course>>), ApiError> {
    let course = state.courses.create(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(course))))
}

pub async fn get_course(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Course> {
    let course = state.courses.find_by_id(id).await?;
    Ok(Json(ApiResponse::ok(course)))
}

pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateCourseRequest>,
) -> ApiResult<Course> {
    let course = state.courses.update(id, request).await?;
    Ok(Json(ApiResponse::ok(course)))
}

pub async fn delete_course(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Deleted> {
    state.courses.delete(id).await?;
    Ok(Json(ApiResponse::ok(Deleted { id })))
}

pub async fn get_course_members(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Vec<i64>> {
    let members = state.courses.members(id).await?;
    Ok(Json(ApiResponse::ok(members)))
}

pub async fn enroll(
    State(state): State<AppState>,
    Path((course_id, user_id)): Path<(i64, i64)>,
) -> Result<(StatusCode, Json<ApiResponse<Enrollment>>), ApiError> {
    state.courses.enroll(course_id, user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(Enrollment { course_id, user_id })),
    ))
}

// ============================================================================
// Metrics Handlers
// ============================================================================

pub async fn get_metric_catalog() -> Json<ApiResponse<Vec<MetricInfo>>> {
    let catalog = METRICS
        .iter()
        .map(|def| MetricInfo {
            name: def.name.to_string(),
            query_id: def.query_id.to_string(),
            description: def.description.to_string(),
        })
        .collect();

    Json(ApiResponse::ok(catalog))
}

pub async fn get_metric(
    State(state): State<AppState>,
    Path(metric): Path<String>,
    Query(params): Query<MetricParams>,
) -> ApiResult<MetricDataResponse> {
    let client = state.metrics.as_ref().ok_or(ApiError::MetricsDisabled)?;

    let metric = metric
        .parse::<crate::utils::Metric>()
        .map_err(|_| MetricsError::UnknownMetric(metric.clone()))?;
    let query_id = params
        .query_id
        .unwrap_or_else(|| metric.default_query_id().to_string());

    let data = client.fetch_metric(metric, &query_id).await?;
    Ok(Json(ApiResponse::ok(data)))
}

// ============================================================================
// Health
// ============================================================================

pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthStatus>> {
    Json(ApiResponse::ok(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        metrics_enabled: state.metrics.is_some(),
    }))
}
