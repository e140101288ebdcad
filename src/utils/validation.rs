//! Input validation utilities

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::{MAX_PASSWORD_LENGTH, MAX_TITLE_LENGTH, MIN_PASSWORD_LENGTH};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

static STORED_FILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]{0,127}$").expect("file name pattern is valid")
});

/// Validate email format (basic validation)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Invalid email format");
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if (password.len() as u64) < MIN_PASSWORD_LENGTH {
        return Err("Password must be at least 8 characters");
    }
    if (password.len() as u64) > MAX_PASSWORD_LENGTH {
        return Err("Password must be at most 128 characters");
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return Err("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Err("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_numeric()) {
        return Err("Password must contain at least one number");
    }
    Ok(())
}

/// Sanitize string input (remove control characters, trim whitespace)
pub fn sanitize_string(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Validate and sanitize a submission title
pub fn validate_title(title: &str) -> Result<String, &'static str> {
    let sanitized = sanitize_string(title);
    if sanitized.is_empty() {
        return Err("Title cannot be empty");
    }
    if sanitized.chars().count() > MAX_TITLE_LENGTH {
        return Err("Title must be at most 300 characters");
    }
    Ok(sanitized)
}

/// Validate a file reference (absolute http(s) URL or a path served by this API)
pub fn validate_file_url(url: &str) -> Result<(), &'static str> {
    let url = url.trim();
    if url.is_empty() {
        return Err("File reference cannot be empty");
    }
    if url.starts_with("https://") || url.starts_with("http://") || url.starts_with('/') {
        Ok(())
    } else {
        Err("File reference must be an http(s) URL or a served file path")
    }
}

/// Validate the name of a stored file (no directories, no traversal)
pub fn validate_stored_file_name(name: &str) -> Result<(), &'static str> {
    if name.contains("..") || !STORED_FILE_RE.is_match(name) {
        return Err("Invalid file name");
    }
    Ok(())
}

/// Check that an upload is a PDF by extension and magic bytes
pub fn validate_pdf_upload(file_name: &str, bytes: &[u8]) -> Result<(), &'static str> {
    if !file_name.to_ascii_lowercase().ends_with(".pdf") {
        return Err("Only PDF files are accepted");
    }
    if !bytes.starts_with(b"%PDF-") {
        return Err("File content is not a PDF");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@localhost").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("Password123").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password("nouppercase123").is_err());
        assert!(validate_password("NOLOWERCASE123").is_err());
        assert!(validate_password("NoNumbers").is_err());
    }

    #[test]
    fn test_validate_title() {
        assert_eq!(validate_title("  Graph Coloring\u{7} ").unwrap(), "Graph Coloring");
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"x".repeat(301)).is_err());
    }

    #[test]
    fn test_validate_file_url() {
        assert!(validate_file_url("https://drive.example.com/file/abc").is_ok());
        assert!(validate_file_url("/api/v1/files/abc.pdf").is_ok());
        assert!(validate_file_url("ftp://host/file").is_err());
        assert!(validate_file_url("").is_err());
    }

    #[test]
    fn test_validate_stored_file_name() {
        assert!(validate_stored_file_name("3f2a_paper.pdf").is_ok());
        assert!(validate_stored_file_name("../etc/passwd").is_err());
        assert!(validate_stored_file_name("a/b.pdf").is_err());
        assert!(validate_stored_file_name(".hidden").is_err());
    }

    #[test]
    fn test_validate_pdf_upload() {
        assert!(validate_pdf_upload("Paper.PDF", b"%PDF-1.7 ...").is_ok());
        assert!(validate_pdf_upload("paper.docx", b"%PDF-1.7").is_err());
        assert!(validate_pdf_upload("paper.pdf", b"PK\x03\x04").is_err());
        assert!(validate_pdf_upload("paper.pdf", b"").is_err());
    }
}
