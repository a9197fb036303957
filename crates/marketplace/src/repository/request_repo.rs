//! 玩具申请仓储

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use super::traits::ToyRequestRepositoryTrait;
use crate::error::{MarketError, Result, is_unique_violation};
use crate::models::{NewToyRequest, RequestStatus, ToyRequest, ToyRequestView};

const REQUEST_COLUMNS: &str = r#"
    id, toy_id, requester_id, owner_id, message, status, decided_at, created_at, updated_at
"#;

const VIEW_SELECT: &str = r#"
    SELECT r.id, r.toy_id, t.title AS toy_title,
           r.requester_id, COALESCE(rq.display_name, rq.username) AS requester_name,
           r.owner_id, COALESCE(ow.display_name, ow.username) AS owner_name,
           r.message, r.status, r.decided_at, r.created_at
    FROM toy_requests r
    JOIN toys t ON t.id = r.toy_id
    JOIN users rq ON rq.id = r.requester_id
    JOIN users ow ON ow.id = r.owner_id
"#;

/// 过滤条件，参数位置固定为 $1..$4
const REQUEST_FILTER: &str = r#"
    WHERE ($1::bigint IS NULL OR r.owner_id = $1)
      AND ($2::bigint IS NULL OR r.requester_id = $2)
      AND ($3::bigint IS NULL OR r.toy_id = $3)
      AND ($4::varchar IS NULL OR r.status = $4)
"#;

/// 申请列表查询条件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestQuery {
    /// 收到的申请（物主视角）
    pub owner_id: Option<i64>,
    /// 发出的申请（申请人视角）
    pub requester_id: Option<i64>,
    pub toy_id: Option<i64>,
    pub status: Option<RequestStatus>,
}

impl RequestQuery {
    pub fn incoming(owner_id: i64, status: Option<RequestStatus>) -> Self {
        Self {
            owner_id: Some(owner_id),
            status,
            ..Default::default()
        }
    }

    pub fn outgoing(requester_id: i64, status: Option<RequestStatus>) -> Self {
        Self {
            requester_id: Some(requester_id),
            status,
            ..Default::default()
        }
    }

    pub fn pending_for_toy(toy_id: i64) -> Self {
        Self {
            toy_id: Some(toy_id),
            status: Some(RequestStatus::Pending),
            ..Default::default()
        }
    }
}

/// 玩具申请仓储
pub struct ToyRequestRepository {
    pool: PgPool,
}

impl ToyRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ==================== 查询操作 ====================

    pub async fn get_request(&self, id: i64) -> Result<Option<ToyRequest>> {
        let sql = format!("SELECT {REQUEST_COLUMNS} FROM toy_requests WHERE id = $1");
        let request = sqlx::query_as::<_, ToyRequest>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(request)
    }

    /// 获取申请展示信息（含玩具标题和双方名称）
    pub async fn get_view(&self, id: i64) -> Result<Option<ToyRequestView>> {
        let sql = format!("{VIEW_SELECT} WHERE r.id = $1");
        let view = sqlx::query_as::<_, ToyRequestView>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(view)
    }

    pub async fn has_pending(&self, toy_id: i64, requester_id: i64) -> Result<bool> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM toy_requests
                WHERE toy_id = $1 AND requester_id = $2 AND status = 'pending'
            )
            "#,
        )
        .bind(toy_id)
        .bind(requester_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn list(
        &self,
        query: &RequestQuery,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ToyRequestView>> {
        let sql = format!(
            "{VIEW_SELECT} {REQUEST_FILTER} ORDER BY r.created_at DESC, r.id DESC LIMIT $5 OFFSET $6"
        );
        let rows = sqlx::query_as::<_, ToyRequestView>(&sql)
            .bind(query.owner_id)
            .bind(query.requester_id)
            .bind(query.toy_id)
            .bind(query.status)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn count(&self, query: &RequestQuery) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM toy_requests r {REQUEST_FILTER}");
        let (total,): (i64,) = sqlx::query_as(&sql)
            .bind(query.owner_id)
            .bind(query.requester_id)
            .bind(query.toy_id)
            .bind(query.status)
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    /// 各状态的申请数量
    pub async fn count_by_status(&self) -> Result<Vec<(RequestStatus, i64)>> {
        let rows: Vec<(RequestStatus, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM toy_requests GROUP BY status ORDER BY status",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ==================== 写入操作 ====================

    /// 创建申请
    ///
    /// 插入与玩具在架检查在同一条语句中完成，`FOR SHARE` 与审批事务的
    /// `FOR UPDATE` 互斥：审批提交后玩具已是 traded，插入不会发生，返回 ToyUnavailable。
    /// 并发重复申请由部分唯一索引拦截，转换为 DuplicatePendingRequest
    pub async fn create_request(&self, request: &NewToyRequest) -> Result<ToyRequest> {
        let sql = format!(
            r#"
            INSERT INTO toy_requests (toy_id, requester_id, owner_id, message, status)
            SELECT $1::bigint, $2::bigint, $3::bigint, $4::text, $5::varchar
            WHERE EXISTS (
                SELECT 1 FROM toys WHERE id = $1 AND status = 'active' FOR SHARE
            )
            RETURNING {REQUEST_COLUMNS}
            "#
        );
        sqlx::query_as::<_, ToyRequest>(&sql)
            .bind(request.toy_id)
            .bind(request.requester_id)
            .bind(request.owner_id)
            .bind(&request.message)
            .bind(RequestStatus::Pending)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e, "uq_toy_requests_pending") {
                    MarketError::DuplicatePendingRequest {
                        toy_id: request.toy_id,
                        requester_id: request.requester_id,
                    }
                } else {
                    e.into()
                }
            })?
            .ok_or(MarketError::ToyUnavailable(request.toy_id))
    }

    // ==================== 事务操作 ====================

    /// 在事务中获取申请（带行级锁）
    pub async fn get_request_for_update(
        conn: &mut PgConnection,
        id: i64,
    ) -> Result<Option<ToyRequest>> {
        let sql = format!("SELECT {REQUEST_COLUMNS} FROM toy_requests WHERE id = $1 FOR UPDATE");
        let request = sqlx::query_as::<_, ToyRequest>(&sql)
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(request)
    }

    /// 在事务中写入决定结果
    pub async fn update_status_in_tx(
        conn: &mut PgConnection,
        id: i64,
        status: RequestStatus,
    ) -> Result<ToyRequest> {
        let sql = format!(
            r#"
            UPDATE toy_requests
            SET status = $2, decided_at = NOW(), updated_at = NOW()
            WHERE id = $1
            RETURNING {REQUEST_COLUMNS}
            "#
        );
        let request = sqlx::query_as::<_, ToyRequest>(&sql)
            .bind(id)
            .bind(status)
            .fetch_one(conn)
            .await?;

        Ok(request)
    }

    /// 在事务中拒绝同一玩具的其他待处理申请，返回被拒绝的数量
    pub async fn reject_other_pending_in_tx(
        conn: &mut PgConnection,
        toy_id: i64,
        approved_id: i64,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE toy_requests
            SET status = 'rejected', decided_at = NOW(), updated_at = NOW()
            WHERE toy_id = $1 AND id <> $2 AND status = 'pending'
            "#,
        )
        .bind(toy_id)
        .bind(approved_id)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl ToyRequestRepositoryTrait for ToyRequestRepository {
    async fn get_request(&self, id: i64) -> Result<Option<ToyRequest>> {
        self.get_request(id).await
    }

    async fn has_pending(&self, toy_id: i64, requester_id: i64) -> Result<bool> {
        self.has_pending(toy_id, requester_id).await
    }

    async fn create_request(&self, request: &NewToyRequest) -> Result<ToyRequest> {
        self.create_request(request).await
    }

    async fn count(&self, query: &RequestQuery) -> Result<i64> {
        self.count(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_query_builders() {
        let q = RequestQuery::incoming(3, Some(RequestStatus::Pending));
        assert_eq!(q.owner_id, Some(3));
        assert!(q.requester_id.is_none());

        let q = RequestQuery::outgoing(4, None);
        assert_eq!(q.requester_id, Some(4));
        assert!(q.status.is_none());

        let q = RequestQuery::pending_for_toy(9);
        assert_eq!(q.toy_id, Some(9));
        assert_eq!(q.status, Some(RequestStatus::Pending));
    }
}
