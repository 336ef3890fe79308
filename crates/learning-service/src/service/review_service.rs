//! 卡片复习服务
//!
//! 负责卡片创建时的初始调度、复习结果的 Leitner 推进以及待复习查询

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use crate::error::{LearningError, Result};
use crate::leitner;
use crate::models::{BookStats, Card, NewCard};
use crate::repository::CardRepositoryTrait;

/// 单次获取待复习卡片的上限
pub const DUE_CARDS_MAX: i64 = 200;

/// 新建卡片参数
#[derive(Debug, Clone, Default)]
pub struct CreateCardInput {
    pub book_id: i64,
    pub front: String,
    pub back: String,
    pub example: Option<String>,
    /// 初始盒子编号，缺省为 0
    pub box_number: Option<i32>,
}

/// 卡片复习服务
pub struct ReviewService<CR>
where
    CR: CardRepositoryTrait,
{
    card_repo: Arc<CR>,
}

impl<CR> ReviewService<CR>
where
    CR: CardRepositoryTrait,
{
    pub fn new(card_repo: Arc<CR>) -> Self {
        Self { card_repo }
    }

    /// 在单词本中创建卡片
    ///
    /// 下次复习时间 = 创建时间 + 2^box 天
    #[instrument(skip(self, input), fields(book_id = input.book_id))]
    pub async fn create_card(&self, user_id: i64, input: CreateCardInput) -> Result<Card> {
        let front = input.front.trim();
        if front.is_empty() {
            return Err(LearningError::Validation("卡片正面不能为空".to_string()));
        }

        self.card_repo
            .get_book(user_id, input.book_id)
            .await?
            .ok_or(LearningError::BookNotFound(input.book_id))?;

        let box_number = leitner::clamp_box(input.box_number.unwrap_or(0));
        let new_card = NewCard {
            user_id,
            book_id: input.book_id,
            front: front.to_string(),
            back: input.back.trim().to_string(),
            example: input.example.filter(|e| !e.trim().is_empty()),
            box_number,
            next_review_at: leitner::next_review_at(Utc::now(), box_number),
        };

        let card = self.card_repo.create_card(&new_card).await?;
        info!(user_id, card_id = card.id, box_number, "Card created");
        Ok(card)
    }

    /// 记录一次复习
    #[instrument(skip(self))]
    pub async fn review_card(&self, user_id: i64, card_id: i64, remembered: bool) -> Result<Card> {
        let card = self
            .card_repo
            .get_card(user_id, card_id)
            .await?
            .ok_or(LearningError::CardNotFound(card_id))?;

        let outcome = leitner::apply_review(&card, remembered, Utc::now());
        let updated = self.card_repo.save_review(card.id, &outcome).await?;

        lingo_shared::observability::metrics::record_card_review(remembered);
        info!(
            user_id,
            card_id,
            remembered,
            from_box = card.box_number,
            to_box = updated.box_number,
            "Card reviewed"
        );
        Ok(updated)
    }

    /// 到期的卡片，按到期时间升序
    pub async fn due_cards(&self, user_id: i64, limit: Option<i64>) -> Result<Vec<Card>> {
        let limit = limit.unwrap_or(DUE_CARDS_MAX).clamp(1, DUE_CARDS_MAX);
        self.card_repo
            .list_due_cards(user_id, Utc::now(), limit)
            .await
    }

    /// 单词本统计：总数、到期数、已掌握数
    pub async fn book_stats(&self, user_id: i64, book_id: i64) -> Result<BookStats> {
        self.card_repo
            .get_book(user_id, book_id)
            .await?
            .ok_or(LearningError::BookNotFound(book_id))?;

        self.card_repo.book_stats(user_id, book_id, Utc::now()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Book;
    use crate::repository::MockCardRepositoryTrait;
    use chrono::{DateTime, Duration};
    use mockall::predicate::eq;

    fn book(user_id: i64, id: i64) -> Book {
        let now = Utc::now();
        Book {
            id,
            user_id,
            title: "Daily English".to_string(),
            description: None,
            color: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn card_from(new_card: &NewCard, id: i64) -> Card {
        let now = Utc::now();
        Card {
            id,
            user_id: new_card.user_id,
            book_id: new_card.book_id,
            front: new_card.front.clone(),
            back: new_card.back.clone(),
            example: new_card.example.clone(),
            box_number: new_card.box_number,
            next_review_at: new_card.next_review_at,
            last_reviewed_at: None,
            review_count: 0,
            correct_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn stored_card(box_number: i32, next_review_at: DateTime<Utc>) -> Card {
        let now = Utc::now();
        Card {
            id: 42,
            user_id: 1,
            book_id: 7,
            front: "bonjour".to_string(),
            back: "hello".to_string(),
            example: None,
            box_number,
            next_review_at,
            last_reviewed_at: None,
            review_count: 5,
            correct_count: 4,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_card_schedules_first_review() {
        let mut repo = MockCardRepositoryTrait::new();
        repo.expect_get_book()
            .with(eq(1), eq(7))
            .returning(|user_id, id| Ok(Some(book(user_id, id))));
        repo.expect_create_card()
            .withf(|c| c.box_number == 2 && c.front == "apple" && c.example.is_none())
            .returning(|c| Ok(card_from(c, 100)));

        let service = ReviewService::new(Arc::new(repo));
        let before = Utc::now();
        let card = service
            .create_card(
                1,
                CreateCardInput {
                    book_id: 7,
                    front: "  apple ".to_string(),
                    back: "苹果".to_string(),
                    example: Some("   ".to_string()),
                    box_number: Some(2),
                },
            )
            .await
            .unwrap();

        assert_eq!(card.id, 100);
        let delay = card.next_review_at - before;
        assert!(delay >= Duration::days(4));
        assert!(delay < Duration::days(4) + Duration::minutes(1));
    }

    #[tokio::test]
    async fn test_create_card_clamps_box() {
        let mut repo = MockCardRepositoryTrait::new();
        repo.expect_get_book()
            .returning(|user_id, id| Ok(Some(book(user_id, id))));
        repo.expect_create_card()
            .withf(|c| c.box_number == leitner::MAX_BOX)
            .returning(|c| Ok(card_from(c, 1)));

        let service = ReviewService::new(Arc::new(repo));
        let card = service
            .create_card(
                1,
                CreateCardInput {
                    book_id: 7,
                    front: "apple".to_string(),
                    back: "苹果".to_string(),
                    box_number: Some(99),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(card.box_number, leitner::MAX_BOX);
    }

    #[tokio::test]
    async fn test_create_card_in_foreign_book_is_not_found() {
        let mut repo = MockCardRepositoryTrait::new();
        repo.expect_get_book().returning(|_, _| Ok(None));
        repo.expect_create_card().never();

        let service = ReviewService::new(Arc::new(repo));
        let err = service
            .create_card(
                2,
                CreateCardInput {
                    book_id: 7,
                    front: "apple".to_string(),
                    back: "苹果".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LearningError::BookNotFound(7)));
    }

    #[tokio::test]
    async fn test_create_card_rejects_blank_front() {
        let repo = MockCardRepositoryTrait::new();
        let service = ReviewService::new(Arc::new(repo));
        let err = service
            .create_card(
                1,
                CreateCardInput {
                    book_id: 7,
                    front: "   ".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LearningError::Validation(_)));
    }

    #[tokio::test]
    async fn test_review_remembered_moves_up_one_box() {
        let mut repo = MockCardRepositoryTrait::new();
        repo.expect_get_card()
            .with(eq(1), eq(42))
            .returning(|_, _| Ok(Some(stored_card(3, Utc::now()))));
        repo.expect_save_review()
            .withf(|id, outcome| {
                *id == 42
                    && outcome.box_number == 4
                    && outcome.review_count == 6
                    && outcome.correct_count == 5
                    && outcome.next_review_at - outcome.reviewed_at == Duration::days(16)
            })
            .returning(|_, outcome| {
                let mut card = stored_card(outcome.box_number, outcome.next_review_at);
                card.review_count = outcome.review_count;
                card.correct_count = outcome.correct_count;
                card.last_reviewed_at = Some(outcome.reviewed_at);
                Ok(card)
            });

        let service = ReviewService::new(Arc::new(repo));
        let card = service.review_card(1, 42, true).await.unwrap();
        assert_eq!(card.box_number, 4);
        assert!(card.last_reviewed_at.is_some());
    }

    #[tokio::test]
    async fn test_review_forgotten_resets_box() {
        let mut repo = MockCardRepositoryTrait::new();
        repo.expect_get_card()
            .returning(|_, _| Ok(Some(stored_card(5, Utc::now()))));
        repo.expect_save_review()
            .withf(|_, outcome| {
                outcome.box_number == 0
                    && outcome.correct_count == 4
                    && outcome.next_review_at - outcome.reviewed_at == Duration::days(1)
            })
            .returning(|_, outcome| Ok(stored_card(outcome.box_number, outcome.next_review_at)));

        let service = ReviewService::new(Arc::new(repo));
        let card = service.review_card(1, 42, false).await.unwrap();
        assert_eq!(card.box_number, 0);
    }

    #[tokio::test]
    async fn test_review_other_users_card_is_not_found() {
        let mut repo = MockCardRepositoryTrait::new();
        repo.expect_get_card().returning(|_, _| Ok(None));
        repo.expect_save_review().never();

        let service = ReviewService::new(Arc::new(repo));
        let err = service.review_card(9, 42, true).await.unwrap_err();
        assert!(matches!(err, LearningError::CardNotFound(42)));
    }

    #[tokio::test]
    async fn test_due_cards_limit_is_clamped() {
        let mut repo = MockCardRepositoryTrait::new();
        repo.expect_list_due_cards()
            .withf(|user_id, _, limit| *user_id == 1 && *limit == DUE_CARDS_MAX)
            .returning(|_, _, _| Ok(vec![]));

        let service = ReviewService::new(Arc::new(repo));
        assert!(service.due_cards(1, Some(10_000)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_book_stats_requires_owned_book() {
        let mut repo = MockCardRepositoryTrait::new();
        repo.expect_get_book().returning(|_, _| Ok(None));
        repo.expect_book_stats().never();

        let service = ReviewService::new(Arc::new(repo));
        let err = service.book_stats(1, 3).await.unwrap_err();
        assert!(matches!(err, LearningError::BookNotFound(3)));
    }
}
