//! 单词本与卡片仓储

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::traits::CardRepositoryTrait;
use crate::error::{LearningError, Result};
use crate::leitner::{MAX_BOX, ReviewOutcome};
use crate::models::{Book, BookStats, Card, CardUpdate, NewCard};
use crate::pagination::Pagination;

const BOOK_COLUMNS: &str = "id, user_id, title, description, color, created_at, updated_at";

const CARD_COLUMNS: &str = "id, user_id, book_id, front, back, example, box_number, \
     next_review_at, last_reviewed_at, review_count, correct_count, created_at, updated_at";

/// 单词本与卡片仓储
pub struct CardRepository {
    pool: PgPool,
}

impl CardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CardRepositoryTrait for CardRepository {
    // ==================== 单词本 ====================

    async fn create_book(
        &self,
        user_id: i64,
        title: &str,
        description: Option<String>,
        color: Option<String>,
    ) -> Result<Book> {
        let sql = format!(
            "INSERT INTO books (user_id, title, description, color) VALUES ($1, $2, $3, $4) RETURNING {}",
            BOOK_COLUMNS
        );
        let book = sqlx::query_as::<_, Book>(&sql)
            .bind(user_id)
            .bind(title)
            .bind(description)
            .bind(color)
            .fetch_one(&self.pool)
            .await?;

        Ok(book)
    }

    async fn get_book(&self, user_id: i64, id: i64) -> Result<Option<Book>> {
        let sql = format!(
            "SELECT {} FROM books WHERE id = $1 AND user_id = $2",
            BOOK_COLUMNS
        );
        let book = sqlx::query_as::<_, Book>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    async fn list_books(&self, user_id: i64) -> Result<Vec<Book>> {
        let sql = format!(
            "SELECT {} FROM books WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
            BOOK_COLUMNS
        );
        let books = sqlx::query_as::<_, Book>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    async fn update_book(
        &self,
        user_id: i64,
        id: i64,
        title: Option<String>,
        description: Option<String>,
        color: Option<String>,
    ) -> Result<Option<Book>> {
        let sql = format!(
            r#"
            UPDATE books
            SET title = COALESCE($3, title),
                description = COALESCE($4, description),
                color = COALESCE($5, color),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );
        let book = sqlx::query_as::<_, Book>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(title)
            .bind(description)
            .bind(color)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    async fn delete_book(&self, user_id: i64, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn book_stats(
        &self,
        user_id: i64,
        book_id: i64,
        now: DateTime<Utc>,
    ) -> Result<BookStats> {
        let stats = sqlx::query_as::<_, BookStats>(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE next_review_at <= $3) AS due,
                   COUNT(*) FILTER (WHERE box_number >= $4) AS mastered
            FROM cards
            WHERE user_id = $1 AND book_id = $2
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(now)
        .bind(MAX_BOX)
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }

    // ==================== 卡片 ====================

    async fn create_card(&self, card: &NewCard) -> Result<Card> {
        let sql = format!(
            r#"
            INSERT INTO cards (user_id, book_id, front, back, example, box_number, next_review_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            CARD_COLUMNS
        );
        let created = sqlx::query_as::<_, Card>(&sql)
            .bind(card.user_id)
            .bind(card.book_id)
            .bind(&card.front)
            .bind(&card.back)
            .bind(&card.example)
            .bind(card.box_number)
            .bind(card.next_review_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn get_card(&self, user_id: i64, id: i64) -> Result<Option<Card>> {
        let sql = format!(
            "SELECT {} FROM cards WHERE id = $1 AND user_id = $2",
            CARD_COLUMNS
        );
        let card = sqlx::query_as::<_, Card>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(card)
    }

    async fn list_cards(
        &self,
        user_id: i64,
        book_id: i64,
        pagination: Pagination,
    ) -> Result<(Vec<Card>, i64)> {
        let total: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM cards WHERE user_id = $1 AND book_id = $2")
                .bind(user_id)
                .bind(book_id)
                .fetch_one(&self.pool)
                .await?;

        let sql = format!(
            r#"
            SELECT {}
            FROM cards
            WHERE user_id = $1 AND book_id = $2
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#,
            CARD_COLUMNS
        );
        let cards = sqlx::query_as::<_, Card>(&sql)
            .bind(user_id)
            .bind(book_id)
            .bind(pagination.limit)
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((cards, total.0))
    }

    async fn update_card(
        &self,
        user_id: i64,
        id: i64,
        update: &CardUpdate,
    ) -> Result<Option<Card>> {
        let sql = format!(
            r#"
            UPDATE cards
            SET front = COALESCE($3, front),
                back = COALESCE($4, back),
                example = COALESCE($5, example),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            CARD_COLUMNS
        );
        let card = sqlx::query_as::<_, Card>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(&update.front)
            .bind(&update.back)
            .bind(&update.example)
            .fetch_optional(&self.pool)
            .await?;

        Ok(card)
    }

    async fn delete_card(&self, user_id: i64, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cards WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ==================== 复习 ====================

    async fn save_review(&self, card_id: i64, outcome: &ReviewOutcome) -> Result<Card> {
        let sql = format!(
            r#"
            UPDATE cards
            SET box_number = $2,
                next_review_at = $3,
                last_reviewed_at = $4,
                review_count = $5,
                correct_count = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            CARD_COLUMNS
        );
        sqlx::query_as::<_, Card>(&sql)
            .bind(card_id)
            .bind(outcome.box_number)
            .bind(outcome.next_review_at)
            .bind(outcome.reviewed_at)
            .bind(outcome.review_count)
            .bind(outcome.correct_count)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(LearningError::CardNotFound(card_id))
    }

    async fn list_due_cards(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Card>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM cards
            WHERE user_id = $1 AND next_review_at <= $2
            ORDER BY next_review_at ASC, id ASC
            LIMIT $3
            "#,
            CARD_COLUMNS
        );
        let cards = sqlx::query_as::<_, Card>(&sql)
            .bind(user_id)
            .bind(now)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(cards)
    }

    async fn count_due(&self, user_id: i64, now: DateTime<Utc>) -> Result<i64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM cards WHERE user_id = $1 AND next_review_at <= $2")
                .bind(user_id)
                .bind(now)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }

    async fn count_cards(&self, user_id: i64) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cards WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
