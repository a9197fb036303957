//! 玩具仓储

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use super::traits::ToyRepositoryTrait;
use crate::error::Result;
use crate::models::{NewToy, Toy, ToyChanges, ToyFilter, ToyStatus};

const TOY_COLUMNS: &str = r#"
    id, owner_id, title, description, category, age_range, condition,
    location, image_url, is_available, status, created_at, updated_at
"#;

/// 过滤条件，参数位置固定为 $1..$7
const TOY_FILTER: &str = r#"
    WHERE ($1::text IS NULL OR title ILIKE $1 OR description ILIKE $1)
      AND ($2::varchar IS NULL OR category = $2)
      AND ($3::varchar IS NULL OR age_range = $3)
      AND ($4::varchar IS NULL OR condition = $4)
      AND ($5::text IS NULL OR location ILIKE $5)
      AND ($6::bigint IS NULL OR owner_id = $6)
      AND ($7::varchar IS NULL OR status = $7)
"#;

/// 玩具仓储
pub struct ToyRepository {
    pool: PgPool,
}

impl ToyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ==================== 查询操作 ====================

    pub async fn get_toy(&self, id: i64) -> Result<Option<Toy>> {
        let sql = format!("SELECT {TOY_COLUMNS} FROM toys WHERE id = $1");
        let toy = sqlx::query_as::<_, Toy>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(toy)
    }

    /// 按条件搜索，最新发布的在前
    pub async fn search(&self, filter: &ToyFilter, limit: i64, offset: i64) -> Result<Vec<Toy>> {
        let sql = format!(
            "SELECT {TOY_COLUMNS} FROM toys {TOY_FILTER} ORDER BY created_at DESC, id DESC LIMIT $8 OFFSET $9"
        );
        let keyword = filter.keyword.as_ref().map(|k| format!("%{}%", k));
        let location = filter.location.as_ref().map(|l| format!("%{}%", l));

        let toys = sqlx::query_as::<_, Toy>(&sql)
            .bind(&keyword)
            .bind(&filter.category)
            .bind(&filter.age_range)
            .bind(filter.condition)
            .bind(&location)
            .bind(filter.owner_id)
            .bind(filter.status)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(toys)
    }

    pub async fn count(&self, filter: &ToyFilter) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM toys {TOY_FILTER}");
        let keyword = filter.keyword.as_ref().map(|k| format!("%{}%", k));
        let location = filter.location.as_ref().map(|l| format!("%{}%", l));

        let (total,): (i64,) = sqlx::query_as(&sql)
            .bind(&keyword)
            .bind(&filter.category)
            .bind(&filter.age_range)
            .bind(filter.condition)
            .bind(&location)
            .bind(filter.owner_id)
            .bind(filter.status)
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    /// 各状态的玩具数量
    pub async fn count_by_status(&self) -> Result<Vec<(ToyStatus, i64)>> {
        let rows: Vec<(ToyStatus, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM toys GROUP BY status ORDER BY status")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows)
    }

    // ==================== 写入操作 ====================

    /// 发布玩具，新玩具总是在架
    pub async fn create_toy(&self, toy: &NewToy) -> Result<Toy> {
        let sql = format!(
            r#"
            INSERT INTO toys (owner_id, title, description, category, age_range, condition,
                              location, image_url, is_available, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE, $9)
            RETURNING {TOY_COLUMNS}
            "#
        );
        let created = sqlx::query_as::<_, Toy>(&sql)
            .bind(toy.owner_id)
            .bind(&toy.title)
            .bind(&toy.description)
            .bind(&toy.category)
            .bind(&toy.age_range)
            .bind(toy.condition)
            .bind(&toy.location)
            .bind(&toy.image_url)
            .bind(ToyStatus::Active)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    /// 修改玩具信息，不涉及状态
    pub async fn update_toy(&self, id: i64, changes: &ToyChanges) -> Result<Option<Toy>> {
        let sql = format!(
            r#"
            UPDATE toys
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                age_range = COALESCE($5, age_range),
                condition = COALESCE($6, condition),
                location = COALESCE($7, location),
                image_url = COALESCE($8, image_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TOY_COLUMNS}
            "#
        );
        let toy = sqlx::query_as::<_, Toy>(&sql)
            .bind(id)
            .bind(&changes.title)
            .bind(&changes.description)
            .bind(&changes.category)
            .bind(&changes.age_range)
            .bind(changes.condition)
            .bind(&changes.location)
            .bind(&changes.image_url)
            .fetch_optional(&self.pool)
            .await?;

        Ok(toy)
    }

    /// 修改上架状态，同时写入 is_available
    ///
    /// 已交换的玩具不会被更新，此时返回 None
    pub async fn set_status(&self, id: i64, status: ToyStatus) -> Result<Option<Toy>> {
        let sql = format!(
            r#"
            UPDATE toys SET status = $2, is_available = $3, updated_at = NOW()
            WHERE id = $1 AND status <> 'traded'
            RETURNING {TOY_COLUMNS}
            "#
        );
        let toy = sqlx::query_as::<_, Toy>(&sql)
            .bind(id)
            .bind(status)
            .bind(status.is_available())
            .fetch_optional(&self.pool)
            .await?;

        Ok(toy)
    }

    pub async fn delete_toy(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM toys WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ==================== 事务操作 ====================

    /// 在事务中获取玩具（带行级锁）
    pub async fn get_toy_for_update(conn: &mut PgConnection, id: i64) -> Result<Option<Toy>> {
        let sql = format!("SELECT {TOY_COLUMNS} FROM toys WHERE id = $1 FOR UPDATE");
        let toy = sqlx::query_as::<_, Toy>(&sql)
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(toy)
    }

    /// 在事务中修改上架状态
    pub async fn set_status_in_tx(conn: &mut PgConnection, id: i64, status: ToyStatus) -> Result<()> {
        sqlx::query(
            "UPDATE toys SET status = $2, is_available = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(status)
        .bind(status.is_available())
        .execute(conn)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ToyRepositoryTrait for ToyRepository {
    async fn get_toy(&self, id: i64) -> Result<Option<Toy>> {
        self.get_toy(id).await
    }

    async fn create_toy(&self, toy: &NewToy) -> Result<Toy> {
        self.create_toy(toy).await
    }

    async fn update_toy(&self, id: i64, changes: &ToyChanges) -> Result<Option<Toy>> {
        self.update_toy(id, changes).await
    }

    async fn set_status(&self, id: i64, status: ToyStatus) -> Result<Option<Toy>> {
        self.set_status(id, status).await
    }

    async fn delete_toy(&self, id: i64) -> Result<bool> {
        self.delete_toy(id).await
    }
}
