//! Domain models
//!
//! This module contains all domain models used throughout the application.

pub mod deadline;
pub mod document;
pub mod review;
pub mod submission;
pub mod user;

pub use deadline::*;
pub use document::*;
pub use review::*;
pub use submission::*;
pub use user::*;
