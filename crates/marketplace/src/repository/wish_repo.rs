//! 心愿单仓储

use sqlx::PgPool;

use crate::error::Result;
use crate::models::{Wish, WishDraft};

const WISH_COLUMNS: &str =
    "id, user_id, title, description, category, age_range, created_at, updated_at";

/// 心愿单仓储
pub struct WishRepository {
    pool: PgPool,
}

impl WishRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_wish(&self, id: i64) -> Result<Option<Wish>> {
        let sql = format!("SELECT {WISH_COLUMNS} FROM wishes WHERE id = $1");
        let wish = sqlx::query_as::<_, Wish>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(wish)
    }

    /// 列出心愿，可按用户过滤
    pub async fn list(&self, user_id: Option<i64>, limit: i64, offset: i64) -> Result<Vec<Wish>> {
        let sql = format!(
            r#"
            SELECT {WISH_COLUMNS} FROM wishes
            WHERE ($1::bigint IS NULL OR user_id = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#
        );
        let wishes = sqlx::query_as::<_, Wish>(&sql)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(wishes)
    }

    pub async fn count(&self, user_id: Option<i64>) -> Result<i64> {
        let (total,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM wishes WHERE ($1::bigint IS NULL OR user_id = $1)")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(total)
    }

    pub async fn create(&self, user_id: i64, draft: &WishDraft) -> Result<Wish> {
        let sql = format!(
            r#"
            INSERT INTO wishes (user_id, title, description, category, age_range)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {WISH_COLUMNS}
            "#
        );
        let wish = sqlx::query_as::<_, Wish>(&sql)
            .bind(user_id)
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(&draft.category)
            .bind(&draft.age_range)
            .fetch_one(&self.pool)
            .await?;

        Ok(wish)
    }

    /// 整体替换心愿内容
    pub async fn update(&self, id: i64, draft: &WishDraft) -> Result<Option<Wish>> {
        let sql = format!(
            r#"
            UPDATE wishes
            SET title = $2, description = $3, category = $4, age_range = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {WISH_COLUMNS}
            "#
        );
        let wish = sqlx::query_as::<_, Wish>(&sql)
            .bind(id)
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(&draft.category)
            .bind(&draft.age_range)
            .fetch_optional(&self.pool)
            .await?;

        Ok(wish)
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM wishes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
