//! Utility functions

pub mod crypto;
pub mod pagination;
pub mod time;
pub mod validation;

pub use crypto::{generate_secure_token, hash_string};
pub use pagination::page_offset;
pub use time::{format_long_date, now_utc, parse_datetime};
pub use validation::{validate_email, validate_password, validate_title};
