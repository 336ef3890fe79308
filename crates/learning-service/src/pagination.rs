//! 分页参数规范化
//!
//! 基于 skip/take 的页码分页：页码从 1 开始，每页 1..=100 条，默认 20 条

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// 规范化后的分页参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// 从可选的原始参数构造，越界值被修正
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// SQL OFFSET（skip）
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        total_pages(total, self.limit)
    }
}

/// 总页数 = ceil(total / limit)，limit 为 0 时返回 0
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if limit <= 0 || total <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = Pagination::new(None, None);
        assert_eq!(p, Pagination::default());
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_clamping() {
        assert_eq!(Pagination::new(Some(0), Some(0)), Pagination { page: 1, limit: 1 });
        assert_eq!(Pagination::new(Some(-5), Some(500)).limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_offset() {
        assert_eq!(Pagination::new(Some(3), Some(20)).offset(), 40);
        assert_eq!(Pagination::new(Some(2), Some(7)).offset(), 7);
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(101, 10), 11);
        assert_eq!(total_pages(5, 0), 0);
    }
}
