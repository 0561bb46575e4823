//! Service façades over the backend APIs.
//!
//! Each operation is a fixed mapping onto one [`ApiClient`](crate::api::ApiClient)
//! call. Errors propagate unchanged, apart from the two auth cases documented
//! on [`AuthService`].

pub mod auth;
pub mod orchestrator;
pub mod users;

pub use auth::AuthService;
pub use orchestrator::OrchestratorService;
pub use users::UsersService;
