//! 用户仓储

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use super::traits::UserRepositoryTrait;
use crate::error::{MarketError, Result, is_unique_violation};
use crate::models::{NewUser, ProfileChanges, User, UserRole};

const USER_COLUMNS: &str = r#"
    id, username, email, password_hash, display_name, location, bio, avatar_url,
    role, sustainability_score, current_badge, toys_shared, successful_exchanges,
    created_at, updated_at
"#;

/// 用户积分与徽章缓存快照，用于批量重算徽章
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserBadgeSnapshot {
    pub id: i64,
    pub sustainability_score: i32,
    pub current_badge: String,
}

/// 用户仓储
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ==================== 查询操作 ====================

    pub async fn get_user(&self, id: i64) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// 按用户名或邮箱查找（登录用，邮箱不区分大小写）
    pub async fn find_by_login(&self, login: &str) -> Result<Option<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1 OR LOWER(email) = LOWER($1)"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(login)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// 分页列出用户（管理后台）
    pub async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    pub async fn count_users(&self) -> Result<i64> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    /// 积分排行榜，同分按注册时间先后
    pub async fn leaderboard(&self, limit: i64) -> Result<Vec<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY sustainability_score DESC, created_at ASC LIMIT $1"
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    pub async fn list_badge_snapshots(&self) -> Result<Vec<UserBadgeSnapshot>> {
        let rows = sqlx::query_as::<_, UserBadgeSnapshot>(
            "SELECT id, sustainability_score, current_badge FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ==================== 写入操作 ====================

    /// 注册新用户
    ///
    /// 用户名、邮箱冲突（包括并发注册）转换为业务错误
    pub async fn create_user(&self, user: &NewUser) -> Result<User> {
        let sql = format!(
            r#"
            INSERT INTO users (username, email, password_hash, display_name, location, role, current_badge)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.display_name)
            .bind(&user.location)
            .bind(UserRole::User)
            .bind(&user.initial_badge)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e, "users_username_key") {
                    MarketError::UsernameTaken(user.username.clone())
                } else if is_unique_violation(&e, "users_email_key") {
                    MarketError::EmailTaken(user.email.clone())
                } else {
                    e.into()
                }
            })
    }

    /// 修改个人资料，未提供的字段保持不变
    pub async fn update_profile(&self, id: i64, changes: &ProfileChanges) -> Result<Option<User>> {
        let sql = format!(
            r#"
            UPDATE users
            SET display_name = COALESCE($2, display_name),
                location = COALESCE($3, location),
                bio = COALESCE($4, bio),
                avatar_url = COALESCE($5, avatar_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(&changes.display_name)
            .bind(&changes.location)
            .bind(&changes.bio)
            .bind(&changes.avatar_url)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// 重写徽章缓存
    ///
    /// 仅当积分仍等于 `expected_score` 时写入；积分已被交换更新的行会跳过，返回 false
    pub async fn update_badge(&self, user_id: i64, expected_score: i32, badge: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users SET current_badge = $2, updated_at = NOW()
            WHERE id = $1 AND sustainability_score = $3
            "#,
        )
        .bind(user_id)
        .bind(badge)
        .bind(expected_score)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    // ==================== 事务操作 ====================

    /// 在事务中获取用户（带行级锁）
    pub async fn get_user_for_update(conn: &mut PgConnection, id: i64) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 FOR UPDATE");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(user)
    }

    /// 在事务中写入交换奖励
    ///
    /// 积分和徽章在同一条语句中写入，保证缓存徽章与积分一致
    pub async fn record_exchange_in_tx(
        conn: &mut PgConnection,
        user_id: i64,
        new_score: i32,
        badge: &str,
        toys_shared_delta: i32,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET sustainability_score = $2,
                current_badge = $3,
                toys_shared = toys_shared + $4,
                successful_exchanges = successful_exchanges + 1,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(new_score)
        .bind(badge)
        .bind(toys_shared_delta)
        .execute(conn)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        self.get_user(id).await
    }

    async fn leaderboard(&self, limit: i64) -> Result<Vec<User>> {
        self.leaderboard(limit).await
    }

    async fn list_badge_snapshots(&self) -> Result<Vec<UserBadgeSnapshot>> {
        self.list_badge_snapshots().await
    }

    async fn update_badge(&self, user_id: i64, expected_score: i32, badge: &str) -> Result<bool> {
        self.update_badge(user_id, expected_score, badge).await
    }
}
