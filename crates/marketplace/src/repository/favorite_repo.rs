//! 收藏仓储

use sqlx::PgPool;

use crate::error::Result;
use crate::models::Toy;

/// 收藏仓储
pub struct FavoriteRepository {
    pool: PgPool,
}

impl FavoriteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 添加收藏（幂等），返回是否新增
    pub async fn add(&self, user_id: i64, toy_id: i64) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO favorites (user_id, toy_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(toy_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 取消收藏，返回是否存在过
    pub async fn remove(&self, user_id: i64, toy_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND toy_id = $2")
            .bind(user_id)
            .bind(toy_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 用户收藏的玩具，按收藏时间倒序
    ///
    /// 他人已下架的玩具不返回，与玩具详情的可见性一致
    pub async fn list_toys(&self, user_id: i64, limit: i64, offset: i64) -> Result<Vec<Toy>> {
        let toys = sqlx::query_as::<_, Toy>(
            r#"
            SELECT t.id, t.owner_id, t.title, t.description, t.category, t.age_range, t.condition,
                   t.location, t.image_url, t.is_available, t.status, t.created_at, t.updated_at
            FROM favorites f
            JOIN toys t ON t.id = f.toy_id
            WHERE f.user_id = $1 AND (t.status <> 'inactive' OR t.owner_id = $1)
            ORDER BY f.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(toys)
    }

    pub async fn count(&self, user_id: i64) -> Result<i64> {
        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM favorites f
            JOIN toys t ON t.id = f.toy_id
            WHERE f.user_id = $1 AND (t.status <> 'inactive' OR t.owner_id = $1)
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}
