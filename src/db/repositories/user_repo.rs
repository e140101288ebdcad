//! User repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Role, User, UserRow},
};

/// Profile fields that can be changed after registration
#[derive(Debug, Default)]
pub struct ProfileUpdate<'a> {
    pub name: Option<&'a str>,
    pub institution: Option<&'a str>,
    pub department: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub password_hash: Option<&'a str>,
}

/// Repository for user database operations
pub struct UserRepository;

impl UserRepository {
    /// Create a new user
    pub async fn create(
        pool: &PgPool,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(pool)
        .await?;

        row.try_into()
    }

    /// Find user by ID
    pub async fn find_by_id(pool: &PgPool, id: &Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, UserRow>(r#"SELECT * FROM users WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    /// Find user by email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, UserRow>(r#"SELECT * FROM users WHERE email = $1"#)
            .bind(email)
            .fetch_optional(pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    /// Find several users at once
    pub async fn find_many(pool: &PgPool, ids: &[Uuid]) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, UserRow>(r#"SELECT * FROM users WHERE id = ANY($1)"#)
            .bind(ids)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    /// Update profile fields
    pub async fn update_profile(
        pool: &PgPool,
        id: &Uuid,
        update: &ProfileUpdate<'_>,
    ) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET
                name = COALESCE($2, name),
                institution = COALESCE($3, institution),
                department = COALESCE($4, department),
                phone = COALESCE($5, phone),
                password_hash = COALESCE($6, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.name)
        .bind(update.institution)
        .bind(update.department)
        .bind(update.phone)
        .bind(update.password_hash)
        .fetch_one(pool)
        .await?;

        row.try_into()
    }

    /// Update user role
    pub async fn update_role(pool: &PgPool, id: &Uuid, role: Role) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET role = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(role.as_str())
        .fetch_one(pool)
        .await?;

        row.try_into()
    }

    /// Activate or deactivate a user
    pub async fn set_active(pool: &PgPool, id: &Uuid, is_active: bool) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET is_active = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(is_active)
        .fetch_one(pool)
        .await?;

        row.try_into()
    }

    /// List users with pagination
    pub async fn list(
        pool: &PgPool,
        offset: i64,
        limit: i64,
        search: Option<&str>,
        role: Option<Role>,
        is_active: Option<bool>,
    ) -> AppResult<(Vec<User>, i64)> {
        let search_pattern = search.map(|s| format!("%{}%", s));
        let role = role.map(|r| r.as_str());

        let users = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT * FROM users
            WHERE
                ($1::text IS NULL OR name ILIKE $1 OR email ILIKE $1)
                AND ($2::text IS NULL OR role = $2)
                AND ($3::boolean IS NULL OR is_active = $3)
            ORDER BY created_at DESC
            OFFSET $4 LIMIT $5
            "#,
        )
        .bind(&search_pattern)
        .bind(role)
        .bind(is_active)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(User::try_from)
        .collect::<AppResult<Vec<_>>>()?;

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM users
            WHERE
                ($1::text IS NULL OR name ILIKE $1 OR email ILIKE $1)
                AND ($2::text IS NULL OR role = $2)
                AND ($3::boolean IS NULL OR is_active = $3)
            "#,
        )
        .bind(&search_pattern)
        .bind(role)
        .bind(is_active)
        .fetch_one(pool)
        .await?;

        Ok((users, count))
    }

    /// Count users grouped by role
    pub async fn count_by_role(pool: &PgPool) -> AppResult<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as(r#"SELECT role, COUNT(*) FROM users GROUP BY role ORDER BY role"#)
                .fetch_all(pool)
                .await?;

        Ok(rows)
    }
}
