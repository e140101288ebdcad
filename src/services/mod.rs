//! Business logic services

pub mod auth_service;
pub mod dashboard_service;
pub mod deadline_service;
pub mod document_service;
pub mod review_service;
pub mod submission_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use dashboard_service::DashboardService;
pub use deadline_service::DeadlineService;
pub use document_service::DocumentService;
pub use review_service::ReviewService;
pub use submission_service::SubmissionService;
pub use user_service::UserService;
