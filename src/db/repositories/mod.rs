//! Database repositories
//!
//! Repositories handle all direct database interactions.

pub mod deadline_repo;
pub mod document_repo;
pub mod submission_repo;
pub mod user_repo;

pub use deadline_repo::DeadlineRepository;
pub use document_repo::{DocumentRepository, NewDocument};
pub use submission_repo::{SubmissionFilter, SubmissionRepository};
pub use user_repo::{ProfileUpdate, UserRepository};
