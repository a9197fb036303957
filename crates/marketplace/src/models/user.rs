//! 用户实体

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::UserRole;

/// 用户
///
/// `password_hash` 不参与序列化，对外展示请使用 `PublicProfile`
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    #[sqlx(default)]
    pub display_name: Option<String>,
    #[sqlx(default)]
    pub location: Option<String>,
    #[sqlx(default)]
    pub bio: Option<String>,
    #[sqlx(default)]
    pub avatar_url: Option<String>,
    pub role: UserRole,
    /// 可持续积分，正常流程中只增不减
    pub sustainability_score: i32,
    /// 当前徽章（由积分推导后缓存）
    pub current_badge: String,
    /// 作为物主完成的交换次数
    pub toys_shared: i32,
    /// 参与完成的交换次数（物主或申请人）
    pub successful_exchanges: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// 展示名，未设置时回退到用户名
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}

/// 新建用户
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
    pub location: Option<String>,
    /// 初始徽章（积分为 0 时的徽章）
    pub initial_badge: String,
}

/// 个人资料修改（None 表示不修改）
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub display_name: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// 公开资料
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub sustainability_score: i32,
    pub current_badge: String,
    pub toys_shared: i32,
    pub successful_exchanges: i32,
    pub member_since: DateTime<Utc>,
}

impl From<User> for PublicProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            location: user.location,
            bio: user.bio,
            avatar_url: user.avatar_url,
            sustainability_score: user.sustainability_score,
            current_badge: user.current_badge,
            toys_shared: user.toys_shared,
            successful_exchanges: user.successful_exchanges,
            member_since: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 1,
            username: "lily".to_string(),
            email: "lily@example.com".to_string(),
            password_hash: "$2b$12$hash".to_string(),
            display_name: None,
            location: Some("Berlin".to_string()),
            bio: None,
            avatar_url: None,
            role: UserRole::User,
            sustainability_score: 12,
            current_badge: "EcoFriend".to_string(),
            toys_shared: 1,
            successful_exchanges: 2,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let json = serde_json::to_value(user()).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["sustainabilityScore"], 12);
    }

    #[test]
    fn test_name_falls_back_to_username() {
        let mut u = user();
        assert_eq!(u.name(), "lily");
        u.display_name = Some("Lily M.".to_string());
        assert_eq!(u.name(), "Lily M.");
    }

    #[test]
    fn test_public_profile_from_user() {
        let profile = PublicProfile::from(user());
        assert_eq!(profile.current_badge, "EcoFriend");
        assert_eq!(profile.location.as_deref(), Some("Berlin"));
    }
}
