//! 用户实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::UserRole;

/// 用户
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
    /// 母语
    #[sqlx(default)]
    pub native_language: Option<String>,
    /// 目标语言
    #[sqlx(default)]
    pub target_language: Option<String>,
    /// 当前水平（如 A1、B2）
    #[sqlx(default)]
    pub level: Option<String>,
    /// 是否接收复习提醒
    pub reminder_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// 新建用户
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub native_language: Option<String>,
    pub target_language: Option<String>,
    pub level: Option<String>,
}

/// 用户资料更新，None 表示不修改
#[derive(Debug, Clone, Default)]
pub struct UserProfileUpdate {
    pub name: Option<String>,
    pub native_language: Option<String>,
    pub target_language: Option<String>,
    pub level: Option<String>,
    pub reminder_enabled: Option<bool>,
}
