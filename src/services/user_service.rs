//! User service

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    authorization,
    db::repositories::{ProfileUpdate, UserRepository},
    error::{AppError, AppResult},
    middleware::auth::AuthenticatedUser,
    models::{Role, User},
    services::AuthService,
    utils::{page_offset, validation},
};

/// Requested profile changes
#[derive(Debug, Default)]
pub struct ProfileChanges<'a> {
    pub name: Option<&'a str>,
    pub institution: Option<&'a str>,
    pub department: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub current_password: Option<&'a str>,
    pub new_password: Option<&'a str>,
}

/// User service for business logic
pub struct UserService;

impl UserService {
    /// Get user by ID (self or admin)
    pub async fn get_user(
        pool: &PgPool,
        requester: &AuthenticatedUser,
        id: &Uuid,
    ) -> AppResult<User> {
        authorization::require_self_or_admin(requester, id)?;
        Self::find(pool, id).await
    }

    /// List users with pagination
    pub async fn list_users(
        pool: &PgPool,
        page: u32,
        per_page: u32,
        search: Option<&str>,
        role: Option<Role>,
        is_active: Option<bool>,
    ) -> AppResult<(Vec<User>, i64)> {
        let offset = page_offset(page, per_page);
        let limit = per_page as i64;
        let search = search.map(str::trim).filter(|s| !s.is_empty());

        UserRepository::list(pool, offset, limit, search, role, is_active).await
    }

    /// Active reviewers, for assignment
    pub async fn list_active_reviewers(pool: &PgPool) -> AppResult<Vec<User>> {
        let (reviewers, _) =
            UserRepository::list(pool, 0, i64::MAX, None, Some(Role::Reviewer), Some(true)).await?;
        Ok(reviewers)
    }

    /// Update user profile
    pub async fn update_profile(
        pool: &PgPool,
        requester: &AuthenticatedUser,
        target_id: &Uuid,
        changes: ProfileChanges<'_>,
    ) -> AppResult<User> {
        authorization::require_self_or_admin(requester, target_id)?;
        let user = Self::find(pool, target_id).await?;

        // Changing a password always needs the current one, even for admins
        let password_hash = match changes.new_password {
            Some(new_password) => {
                let current = changes
                    .current_password
                    .ok_or_else(|| AppError::Validation("Current password required".to_string()))?;
                if !AuthService::verify_password(current, &user.password_hash)? {
                    return Err(AppError::InvalidCredentials);
                }
                validation::validate_password(new_password)
                    .map_err(|e| AppError::Validation(e.to_string()))?;
                Some(AuthService::hash_password(new_password)?)
            }
            None => None,
        };

        let name = changes.name.map(validation::sanitize_string);
        if name.as_deref() == Some("") {
            return Err(AppError::Validation("Name cannot be empty".to_string()));
        }

        let user = UserRepository::update_profile(
            pool,
            target_id,
            &ProfileUpdate {
                name: name.as_deref(),
                institution: changes.institution.map(str::trim),
                department: changes.department.map(str::trim),
                phone: changes.phone.map(str::trim),
                password_hash: password_hash.as_deref(),
            },
        )
        .await?;

        tracing::info!(
            user_id = %user.id,
            by = %requester.id,
            password_changed = password_hash.is_some(),
            "Profile updated"
        );
        Ok(user)
    }

    /// Change a user's role (admin, never their own)
    pub async fn update_role(
        pool: &PgPool,
        requester: &AuthenticatedUser,
        target_id: &Uuid,
        role: Role,
    ) -> AppResult<User> {
        if &requester.id == target_id {
            return Err(AppError::Forbidden("Cannot change your own role".to_string()));
        }
        Self::find(pool, target_id).await?;

        let user = UserRepository::update_role(pool, target_id, role).await?;
        tracing::info!(user_id = %user.id, role = %role, by = %requester.id, "Role changed");
        Ok(user)
    }

    /// Activate or deactivate a user (admin, never themself)
    pub async fn set_active(
        pool: &PgPool,
        requester: &AuthenticatedUser,
        target_id: &Uuid,
        is_active: bool,
    ) -> AppResult<User> {
        if &requester.id == target_id && !is_active {
            return Err(AppError::Forbidden("Cannot deactivate your own account".to_string()));
        }
        Self::find(pool, target_id).await?;

        let user = UserRepository::set_active(pool, target_id, is_active).await?;
        tracing::info!(user_id = %user.id, is_active, by = %requester.id, "Account status changed");
        Ok(user)
    }

    async fn find(pool: &PgPool, id: &Uuid) -> AppResult<User> {
        UserRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}
