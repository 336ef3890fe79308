//! 通知记录仓储

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::NotificationLogRepositoryTrait;
use crate::error::Result;
use crate::models::{NewNotificationLog, NotificationLog, NotificationStatus};
use crate::pagination::Pagination;

const LOG_COLUMNS: &str =
    "id, user_id, kind, title, body, status, error, read_at, created_at, updated_at";

/// 通知记录仓储
pub struct NotificationLogRepository {
    pool: PgPool,
}

impl NotificationLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationLogRepositoryTrait for NotificationLogRepository {
    async fn create(&self, log: &NewNotificationLog) -> Result<NotificationLog> {
        let sql = format!(
            r#"
            INSERT INTO notification_logs (user_id, kind, title, body, status, error)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            LOG_COLUMNS
        );
        let row = sqlx::query_as::<_, NotificationLog>(&sql)
            .bind(log.user_id)
            .bind(log.kind)
            .bind(&log.title)
            .bind(&log.body)
            .bind(log.status)
            .bind(&log.error)
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    async fn update_status(
        &self,
        id: i64,
        status: NotificationStatus,
        error: Option<String>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE notification_logs
            SET status = $2, error = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(error)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        pagination: Pagination,
    ) -> Result<(Vec<NotificationLog>, i64)> {
        let total: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM notification_logs WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        let sql = format!(
            r#"
            SELECT {}
            FROM notification_logs
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
            LOG_COLUMNS
        );
        let rows = sqlx::query_as::<_, NotificationLog>(&sql)
            .bind(user_id)
            .bind(pagination.limit)
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total.0))
    }

    async fn latest_for_user(&self, user_id: i64) -> Result<Option<NotificationLog>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM notification_logs
            WHERE user_id = $1 AND status IN ('pending', 'sent')
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
            LOG_COLUMNS
        );
        let row = sqlx::query_as::<_, NotificationLog>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn mark_read(&self, user_id: i64, id: i64) -> Result<Option<NotificationLog>> {
        let sql = format!(
            r#"
            UPDATE notification_logs
            SET read_at = COALESCE(read_at, NOW()),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            LOG_COLUMNS
        );
        let row = sqlx::query_as::<_, NotificationLog>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }
}
