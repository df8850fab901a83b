/// HTTP API Server module
/// Exposes the user, course and metrics services as JSON endpoints

pub mod auth;
pub mod handlers;
pub mod routes;

use std::net::SocketAddr;

use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::core::{db, AppConfig, CourseService, MetricsClient, PasswordEncoder, UserService};

pub use routes::create_router;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub courses: CourseService,
    /// `None` when CloudWatch credentials are not configured
    pub metrics: Option<MetricsClient>,
    pub admin_token: Option<String>,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        encoder: PasswordEncoder,
        metrics: Option<MetricsClient>,
        admin_token: Option<String>,
    ) -> Self {
        Self {
            users: UserService::new(pool.clone(), encoder),
            courses: CourseService::new(pool),
            metrics,
            admin_token,
        }
    }

    pub fn from_config(config: &AppConfig, pool: SqlitePool) -> Self {
        let metrics = if config.cloudwatch.is_configured() {
            match MetricsClient::from_config(&config.cloudwatch) {
                Ok(client) => Some(client),
                Err(e) => {
                    warn!(error = %e, "metrics client unavailable");
                    None
                }
            }
        } else {
            None
        };

        Self::new(
            pool,
            PasswordEncoder::new(config.security.bcrypt_cost),
            metrics,
            config.server.admin_token.clone(),
        )
    }
}

pub async fn run(config: AppConfig, in_memory: bool) -> anyhow::Result<()> {
    let pool = if in_memory {
        db::open_in_memory().await?
    } else {
        db::open(&config.database).await?
    };

    let state = AppState::from_config(&config, pool);
    let auth_enabled = state.admin_token.is_some();
    let metrics_enabled = state.metrics.is_some();
    let app = create_router(state, config.server.cors);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    println!("P2K Course Server");
    println!("   API:     http://{}/api", addr);
    if auth_enabled {
        println!("   Auth:    Enabled (admin token required)");
    } else {
        println!("   Auth:    Disabled (no admin token)");
    }
    if metrics_enabled {
        println!("   Metrics: {} in {}", config.cloudwatch.instance_id, config.cloudwatch.region);
    } else {
        println!("   Metrics: Disabled (CloudWatch not configured)");
    }
    println!();

    info!(%addr, in_memory, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
