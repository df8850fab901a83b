pub mod cloudwatch;
pub mod config;
pub mod course;
pub mod db;
pub mod error;
pub mod password;
pub mod repository;
pub mod user;

pub use cloudwatch::{CloudWatchSource, MetricDataResponse, MetricQuery, MetricSeries, MetricSource, MetricsClient, MetricsError};
pub use config::AppConfig;
pub use course::{Course, CourseService};
pub use error::{DbError, ServiceError, ServiceResult};
pub use password::PasswordEncoder;
pub use user::{Role, User, UserService, UserView};
