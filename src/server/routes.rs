/// API Routes definition

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::auth;
use super::handlers;
use super::AppState;

pub fn create_router(state: AppState, enable_cors: bool) -> Router {
    // Admin routes (require the admin token)
    let admin_routes = Router::new()
        .route("/api/admin/users/:id/approve", post(handlers::approve_user))
        .route("/api/admin/metrics", get(handlers::get_metric_catalog))
        .route("/api/admin/metrics/:metric", get(handlers::get_metric))
        .layer(middleware::from_fn_with_state(state.clone(), auth::auth_middleware));

    let public_routes = Router::new()
        .route("/api/users/join", post(handlers::join))
        .route("/api/users/check-email", get(handlers::check_email))
        .route("/api/users/reset-password", post(handlers::reset_password))
        .route(
            "/api/users/:id",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route("/api/courses", get(handlers::list_courses).post(handlers::create_course))
        .route(
            "/api/courses/:id",
            get(handlers::get_course)
                .put(handlers::update_course)
                .delete(handlers::delete_course),
        )
        .route("/api/courses/:id/users", get(handlers::get_course_members))
        .route("/api/courses/:id/users/:user_id", post(handlers::enroll))
        .route("/api/health", get(handlers::health_check));

    let mut app = Router::new()
        .merge(admin_routes)
        .merge(public_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if enable_cors {
        app = app.layer(CorsLayer::permissive());
    }

    app
}
