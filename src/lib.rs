//! Review Desk - Paper Submission and Peer Review Backend
//!
//! This library provides the core functionality for Review Desk, a backend
//! where students submit research papers and projects, reviewers assess them,
//! and administrators run the process.
//!
//! # Features
//!
//! - Submission lifecycle with a strict state machine
//! - Role allow-lists for students, reviewers, and admins
//! - Reviewer assignment with a majority-vote final decision
//! - Submission and resubmission deadlines
//! - PDF certificates and reviewer appreciation letters with verification codes
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Business logic
//! - **Repositories**: Database access
//! - **Models**: Domain models and the lifecycle rules

pub mod authorization;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod pdf;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
