//! 用户仓储

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::traits::UserRepositoryTrait;
use crate::error::Result;
use crate::models::{NewUser, ReminderCandidate, User, UserProfileUpdate};

const USER_COLUMNS: &str = "id, email, password_hash, name, role, native_language, \
     target_language, level, reminder_enabled, created_at, updated_at";

/// 用户仓储
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER($1)",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn create(&self, user: &NewUser) -> Result<User> {
        let sql = format!(
            r#"
            INSERT INTO users (email, password_hash, name, native_language, target_language, level)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let created = sqlx::query_as::<_, User>(&sql)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.name)
            .bind(&user.native_language)
            .bind(&user.target_language)
            .bind(&user.level)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn update_profile(&self, id: i64, update: &UserProfileUpdate) -> Result<Option<User>> {
        let sql = format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                native_language = COALESCE($3, native_language),
                target_language = COALESCE($4, target_language),
                level = COALESCE($5, level),
                reminder_enabled = COALESCE($6, reminder_enabled),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(&update.name)
            .bind(&update.native_language)
            .bind(&update.target_language)
            .bind(&update.level)
            .bind(update.reminder_enabled)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn list_reminder_candidates(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<ReminderCandidate>> {
        let candidates = sqlx::query_as::<_, ReminderCandidate>(
            r#"
            SELECT u.id AS user_id, u.name, COUNT(c.id) AS due_count
            FROM users u
            JOIN cards c ON c.user_id = u.id AND c.next_review_at <= $1
            WHERE u.reminder_enabled
              AND EXISTS (SELECT 1 FROM push_subscriptions s WHERE s.user_id = u.id)
            GROUP BY u.id, u.name
            ORDER BY u.id
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(candidates)
    }
}
