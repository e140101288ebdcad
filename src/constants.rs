//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

// =============================================================================
// AUTHENTICATION DEFAULTS
// =============================================================================

/// Default JWT token expiry in hours
pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;

/// Default refresh token expiry in days
pub const DEFAULT_REFRESH_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: u64 = 8;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: u64 = 128;

/// Maximum length of a person's display name
pub const MAX_NAME_LENGTH: u64 = 100;

// =============================================================================
// SUBMISSION RULES
// =============================================================================

/// Maximum length of a submission title
pub const MAX_TITLE_LENGTH: usize = 300;

/// Authors allowed on a research paper
pub const RESEARCH_PAPER_AUTHORS: usize = 1;

/// Maximum authors on a project
pub const MAX_PROJECT_AUTHORS: usize = 3;

/// Maximum length of a review comment
pub const MAX_COMMENT_LENGTH: u64 = 10_000;

// =============================================================================
// STORAGE DEFAULTS
// =============================================================================

/// Default directory for uploaded manuscripts
pub const DEFAULT_UPLOADS_PATH: &str = "./data/uploads";

/// Default directory for generated certificates and letters
pub const DEFAULT_DOCUMENTS_PATH: &str = "./data/documents";

/// Default directory searched for TrueType fonts
pub const DEFAULT_FONTS_PATH: &str = "/usr/share/fonts/truetype/liberation";

/// Default maximum upload size in megabytes
pub const DEFAULT_MAX_UPLOAD_MB: usize = 20;

/// Default issuing organization printed on documents
pub const DEFAULT_ORGANIZATION_NAME: &str = "Review Desk";

/// Public path prefix under which stored files are served
pub const FILES_URL_PREFIX: &str = "/api/v1/files";

/// Path prefix of generated documents
pub const DOCUMENTS_URL_PREFIX: &str = "/api/v1/documents";

/// Length of the document verification code (hex digits)
pub const VERIFICATION_CODE_LENGTH: usize = 16;

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for list endpoints
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Maximum page size for list endpoints
pub const MAX_PAGE_SIZE: u32 = 100;

// =============================================================================
// RATE LIMITING
// =============================================================================

/// Rate limit settings
pub mod rate_limits {
    /// Max auth requests per window
    pub const AUTH_MAX_REQUESTS: i64 = 10;
    /// Auth window in seconds
    pub const AUTH_WINDOW_SECS: i64 = 60;

    /// Max submission write requests per window
    pub const SUBMISSION_MAX_REQUESTS: i64 = 30;
    /// Submission window in seconds
    pub const SUBMISSION_WINDOW_SECS: i64 = 60;

    /// Max general API requests per window
    pub const GENERAL_MAX_REQUESTS: i64 = 120;
    /// General window in seconds
    pub const GENERAL_WINDOW_SECS: i64 = 60;
}

// =============================================================================
// REDIS KEYS
// =============================================================================

/// Redis key prefixes
pub mod redis_keys {
    pub const REFRESH_TOKEN: &str = "refresh_token";
    pub const RATE_LIMIT: &str = "rate_limit";
}
