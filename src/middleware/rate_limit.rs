//! Rate limiting middleware
//!
//! Fixed-window counters in Redis, keyed by client IP and path bucket.

use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use redis::AsyncCommands;
use std::net::SocketAddr;

use crate::{
    constants::{rate_limits, redis_keys},
    error::AppError,
    state::AppState,
};

/// Rate limit middleware
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();
    let bucket = path_bucket(&path);
    let (limit, window) = bucket_limits(bucket);

    let key = format!("{}:{}:{}", redis_keys::RATE_LIMIT, addr.ip(), bucket);
    let mut redis = state.redis();

    // Redis being down should not take the API with it
    let count: i64 = match redis.incr(&key, 1).await {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!(error = %e, "Rate limiter unavailable, allowing request");
            return Ok(next.run(request).await);
        }
    };

    if count == 1 {
        if let Err(e) = redis.expire::<_, ()>(&key, window).await {
            tracing::warn!(error = %e, key = %key, "Failed to set rate limit window");
        }
    }

    if count > limit {
        tracing::debug!(ip = %addr.ip(), bucket, count, "Rate limit exceeded");
        return Err(AppError::TooManyRequests);
    }

    Ok(next.run(request).await)
}

/// Bucket a path falls into
fn path_bucket(path: &str) -> &'static str {
    if path.starts_with("/api/v1/auth") {
        "auth"
    } else if path.starts_with("/api/v1/submissions") || path.starts_with("/api/v1/files") {
        "submissions"
    } else {
        "general"
    }
}

/// (max requests, window seconds) of a bucket
fn bucket_limits(bucket: &str) -> (i64, i64) {
    match bucket {
        "auth" => (rate_limits::AUTH_MAX_REQUESTS, rate_limits::AUTH_WINDOW_SECS),
        "submissions" => (
            rate_limits::SUBMISSION_MAX_REQUESTS,
            rate_limits::SUBMISSION_WINDOW_SECS,
        ),
        _ => (rate_limits::GENERAL_MAX_REQUESTS, rate_limits::GENERAL_WINDOW_SECS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_bucket() {
        assert_eq!(path_bucket("/api/v1/auth/login"), "auth");
        assert_eq!(path_bucket("/api/v1/submissions/abc/reviews"), "submissions");
        assert_eq!(path_bucket("/api/v1/files"), "submissions");
        assert_eq!(path_bucket("/api/v1/dashboard"), "general");
    }

    #[test]
    fn test_auth_bucket_is_strictest() {
        assert!(bucket_limits("auth").0 < bucket_limits("general").0);
    }
}
