//! 推送订阅仓储

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::PushSubscriptionRepositoryTrait;
use crate::error::Result;
use crate::models::{NewPushSubscription, PushSubscription};

const SUBSCRIPTION_COLUMNS: &str =
    "id, user_id, endpoint, p256dh, auth, user_agent, created_at, updated_at";

/// 推送订阅仓储
pub struct PushSubscriptionRepository {
    pool: PgPool,
}

impl PushSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PushSubscriptionRepositoryTrait for PushSubscriptionRepository {
    async fn upsert(&self, subscription: &NewPushSubscription) -> Result<PushSubscription> {
        let sql = format!(
            r#"
            INSERT INTO push_subscriptions (user_id, endpoint, p256dh, auth, user_agent)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (endpoint) DO UPDATE
            SET user_id = EXCLUDED.user_id,
                p256dh = EXCLUDED.p256dh,
                auth = EXCLUDED.auth,
                user_agent = EXCLUDED.user_agent,
                updated_at = NOW()
            RETURNING {}
            "#,
            SUBSCRIPTION_COLUMNS
        );
        let row = sqlx::query_as::<_, PushSubscription>(&sql)
            .bind(subscription.user_id)
            .bind(&subscription.endpoint)
            .bind(&subscription.p256dh)
            .bind(&subscription.auth)
            .bind(&subscription.user_agent)
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<PushSubscription>> {
        let sql = format!(
            "SELECT {} FROM push_subscriptions WHERE user_id = $1 ORDER BY id",
            SUBSCRIPTION_COLUMNS
        );
        let rows = sqlx::query_as::<_, PushSubscription>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn delete_for_user(&self, user_id: i64, endpoint: &str) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM push_subscriptions WHERE user_id = $1 AND endpoint = $2")
                .bind(user_id)
                .bind(endpoint)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_endpoint(&self, endpoint: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM push_subscriptions WHERE endpoint = $1")
            .bind(endpoint)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
