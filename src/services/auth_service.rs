//! Authentication service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    config::{Config, JwtConfig},
    constants::redis_keys,
    db::repositories::UserRepository,
    error::{AppError, AppResult},
    models::{Role, User},
    utils::{crypto, validation},
};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Issued token pair
#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// Register a new student account
    pub async fn register(pool: &PgPool, name: &str, email: &str, password: &str) -> AppResult<User> {
        let email = email.trim().to_lowercase();
        validation::validate_password(password)
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if UserRepository::find_by_email(pool, &email).await?.is_some() {
            return Err(AppError::AlreadyExists("Email already registered".to_string()));
        }

        let password_hash = Self::hash_password(password)?;
        let name = validation::sanitize_string(name);

        let user = UserRepository::create(pool, &name, &email, &password_hash, Role::Student).await?;
        tracing::info!(user_id = %user.id, "User registered");

        Ok(user)
    }

    /// Login with email and password
    pub async fn login(
        pool: &PgPool,
        redis: ConnectionManager,
        config: &Config,
        email: &str,
        password: &str,
    ) -> AppResult<(User, TokenPair)> {
        let user = UserRepository::find_by_email(pool, &email.trim().to_lowercase())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !Self::verify_password(password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AppError::AccountInactive);
        }

        let tokens = Self::issue_tokens(redis, &config.jwt, &user).await?;
        Ok((user, tokens))
    }

    /// Rotate a refresh token
    pub async fn refresh_token(
        pool: &PgPool,
        mut redis: ConnectionManager,
        config: &Config,
        refresh_token: &str,
    ) -> AppResult<TokenPair> {
        let key = refresh_key(refresh_token);
        let user_id: Option<String> = redis.get(&key).await?;
        let user_id = user_id.ok_or(AppError::InvalidToken)?;
        let user_id = Uuid::parse_str(&user_id).map_err(|_| AppError::InvalidToken)?;

        let user = UserRepository::find_by_id(pool, &user_id)
            .await?
            .ok_or(AppError::InvalidToken)?;
        if !user.is_active {
            return Err(AppError::AccountInactive);
        }

        redis.del::<_, ()>(&key).await?;
        redis
            .srem::<_, _, ()>(user_sessions_key(&user.id), refresh_token)
            .await?;

        Self::issue_tokens(redis, &config.jwt, &user).await
    }

    /// Logout (invalidate refresh tokens)
    pub async fn logout(
        mut redis: ConnectionManager,
        user_id: &Uuid,
        refresh_token: Option<&str>,
        all_sessions: bool,
    ) -> AppResult<()> {
        let sessions_key = user_sessions_key(user_id);

        if all_sessions {
            let tokens: Vec<String> = redis.smembers(&sessions_key).await?;
            for token in &tokens {
                redis.del::<_, ()>(refresh_key(token)).await?;
            }
            redis.del::<_, ()>(&sessions_key).await?;
            tracing::info!(user_id = %user_id, sessions = tokens.len(), "Logged out of all sessions");
        } else if let Some(token) = refresh_token {
            let key = refresh_key(token);
            let owner: Option<String> = redis.get(&key).await?;
            if token_belongs_to(owner.as_deref(), user_id) {
                redis.del::<_, ()>(&key).await?;
                redis.srem::<_, _, ()>(&sessions_key, token).await?;
            } else {
                tracing::debug!(user_id = %user_id, "Ignoring logout for a refresh token the user does not hold");
            }
        }

        Ok(())
    }

    /// Verify JWT token and extract claims
    pub fn verify_token(token: &str, secret: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    /// Hash password using Argon2
    pub fn hash_password(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?
            .to_string();

        Ok(hash)
    }

    /// Verify password against hash
    pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Generate access token
    pub fn generate_access_token(user: &User, jwt: &JwtConfig) -> AppResult<(String, i64)> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(jwt.expiry_hours);
        let expires_in = jwt.expiry_hours * 3600;

        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role.as_str().to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(jwt.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))?;

        Ok((token, expires_in))
    }

    async fn issue_tokens(
        mut redis: ConnectionManager,
        jwt: &JwtConfig,
        user: &User,
    ) -> AppResult<TokenPair> {
        let (access_token, expires_in) = Self::generate_access_token(user, jwt)?;
        let refresh_token = crypto::generate_secure_token(48);

        let expiry = (jwt.refresh_token_expiry_days * 24 * 60 * 60) as u64;
        redis
            .set_ex::<_, _, ()>(refresh_key(&refresh_token), user.id.to_string(), expiry)
            .await?;
        redis
            .sadd::<_, _, ()>(user_sessions_key(&user.id), &refresh_token)
            .await?;
        redis
            .expire::<_, ()>(user_sessions_key(&user.id), expiry as i64)
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in,
        })
    }
}

fn refresh_key(token: &str) -> String {
    format!("{}:{}", redis_keys::REFRESH_TOKEN, token)
}

fn user_sessions_key(user_id: &Uuid) -> String {
    format!("{}:user:{}", redis_keys::REFRESH_TOKEN, user_id)
}

/// Whether a stored refresh-token owner matches `user_id`
fn token_belongs_to(owner: Option<&str>, user_id: &Uuid) -> bool {
    owner
        .and_then(|o| Uuid::parse_str(o).ok())
        .is_some_and(|o| &o == user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            expiry_hours: 1,
            refresh_token_expiry_days: 1,
        }
    }

    fn user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: String::new(),
            role,
            is_active: true,
            institution: None,
            department: None,
            phone: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let user = user(Role::Reviewer);
        let (token, expires_in) = AuthService::generate_access_token(&user, &jwt()).unwrap();
        assert_eq!(expires_in, 3600);

        let claims = AuthService::verify_token(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.role, "reviewer");
    }

    #[test]
    fn test_token_with_wrong_secret_is_rejected() {
        let (token, _) = AuthService::generate_access_token(&user(Role::Admin), &jwt()).unwrap();
        assert!(matches!(
            AuthService::verify_token(&token, "other-secret"),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let mut config = jwt();
        config.expiry_hours = -2;
        let (token, _) = AuthService::generate_access_token(&user(Role::Student), &config).unwrap();
        assert!(matches!(
            AuthService::verify_token(&token, "test-secret"),
            Err(AppError::TokenExpired)
        ));
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hash = AuthService::hash_password("Password123").unwrap();
        assert!(AuthService::verify_password("Password123", &hash).unwrap());
        assert!(!AuthService::verify_password("password123", &hash).unwrap());
    }

    #[test]
    fn test_refresh_keys() {
        let id = Uuid::nil();
        assert_eq!(refresh_key("abc"), "refresh_token:abc");
        assert_eq!(
            user_sessions_key(&id),
            "refresh_token:user:00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_logout_only_revokes_own_refresh_token() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();

        assert!(token_belongs_to(Some(&me.to_string()), &me));
        assert!(!token_belongs_to(Some(&other.to_string()), &me));
        assert!(!token_belongs_to(None, &me));
        assert!(!token_belongs_to(Some("garbage"), &me));
    }
}
