/// Relational repositories
///
/// Every function takes `&mut SqliteConnection` so a service can run several
/// of them inside one transaction (`&mut *tx`).

pub mod course;
pub mod course_user;
pub mod user;
pub mod vm;

pub use course::CourseRepository;
pub use course_user::CourseUserRepository;
pub use user::{NewUser, UserRepository};
pub use vm::{Vm, VmRepository};
