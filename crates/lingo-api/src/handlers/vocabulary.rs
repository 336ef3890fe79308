//! 词汇生成单词卡处理器

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use learning::service::CreateCardInput;
use learning::{Card, VocabularyEntry, VocabularyKind};
use tracing::info;

use crate::auth::AuthUser;
use crate::dto::{ApiResponse, VocabularyToCardRequest};
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// 把视频、播客或文章中的词汇加入单词本
///
/// POST /api/vocabulary/{kind}/{id}/cards
///
/// 正面为单词，背面为翻译和释义，例句原样保留
pub async fn create_card_from_vocabulary(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((kind, id)): Path<(String, i64)>,
    Json(req): Json<VocabularyToCardRequest>,
) -> Result<Json<ApiResponse<Card>>> {
    let kind: VocabularyKind = kind.parse().map_err(ApiError::Validation)?;

    let entry = sqlx::query_as::<_, VocabularyEntry>(&lookup_sql(kind))
        .bind(id)
        .bind(auth.is_admin())
        .fetch_optional(&state.pool)
        .await?
        .ok_or(ApiError::VocabularyNotFound(id))?;

    let back = entry.card_back();
    let card = state
        .review_service
        .create_card(
            auth.id,
            CreateCardInput {
                book_id: req.book_id,
                front: entry.word,
                back,
                example: entry.example,
                box_number: None,
            },
        )
        .await?;

    info!(
        user_id = auth.id,
        vocabulary_kind = ?kind,
        vocabulary_id = id,
        card_id = card.id,
        "Card created from vocabulary"
    );
    Ok(Json(ApiResponse::success(card)))
}

/// 按 id 查询词汇，所属内容未发布时仅管理员可见
///
/// 表名来自枚举，不接受外部输入
fn lookup_sql(kind: VocabularyKind) -> String {
    let (parent, foreign_key) = kind.parent();
    format!(
        r#"
        SELECT v.word, v.translation, v.definition, v.example
        FROM {} v
        JOIN {} p ON p.id = v.{}
        WHERE v.id = $1 AND ($2 OR p.published)
        "#,
        kind.table(),
        parent,
        foreign_key
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_joins_parent_and_checks_published() {
        let sql = lookup_sql(VocabularyKind::Podcast);
        assert!(sql.contains("FROM podcast_vocabulary v"));
        assert!(sql.contains("JOIN podcasts p ON p.id = v.podcast_id"));
        assert!(sql.contains("($2 OR p.published)"));

        for kind in [VocabularyKind::Video, VocabularyKind::Article] {
            let (parent, foreign_key) = kind.parent();
            let sql = lookup_sql(kind);
            assert!(sql.contains(&format!("JOIN {parent} p ON p.id = v.{foreign_key}")));
            assert!(sql.contains("($2 OR p.published)"));
        }
    }
}
