//! 玩具发布管理服务
//!
//! 物主发布、编辑、上下架和删除自己的玩具，管理员审核玩具状态。
//! `traded` 只能由审批流程写入，这里的任何入口都不能设置或撤销它。

use std::sync::Arc;

use tracing::{info, instrument};

use toyshare_shared::observability::metrics;

use crate::error::{MarketError, Result};
use crate::models::{NewToy, Toy, ToyChanges, ToyStatus};
use crate::repository::{
    RequestQuery, ToyRepository, ToyRepositoryTrait, ToyRequestRepository,
    ToyRequestRepositoryTrait,
};

/// 玩具发布管理服务
pub struct ListingService<TR = ToyRepository, RR = ToyRequestRepository>
where
    TR: ToyRepositoryTrait,
    RR: ToyRequestRepositoryTrait,
{
    toy_repo: Arc<TR>,
    request_repo: Arc<RR>,
}

impl<TR, RR> ListingService<TR, RR>
where
    TR: ToyRepositoryTrait,
    RR: ToyRequestRepositoryTrait,
{
    pub fn new(toy_repo: Arc<TR>, request_repo: Arc<RR>) -> Self {
        Self {
            toy_repo,
            request_repo,
        }
    }

    /// 发布玩具
    #[instrument(skip(self, toy), fields(owner_id = toy.owner_id))]
    pub async fn create_toy(&self, toy: NewToy) -> Result<Toy> {
        let created = self.toy_repo.create_toy(&toy).await?;
        metrics::record_toy_listed(&created.category);
        info!(toy_id = created.id, category = %created.category, "玩具已发布");
        Ok(created)
    }

    /// 物主编辑玩具信息
    pub async fn update_toy(&self, toy_id: i64, actor_id: i64, changes: ToyChanges) -> Result<Toy> {
        self.owned_toy(toy_id, actor_id).await?;
        self.toy_repo
            .update_toy(toy_id, &changes)
            .await?
            .ok_or(MarketError::ToyNotFound(toy_id))
    }

    /// 物主上下架
    pub async fn set_availability(&self, toy_id: i64, actor_id: i64, available: bool) -> Result<Toy> {
        let toy = self.owned_toy(toy_id, actor_id).await?;
        let status = if available {
            ToyStatus::Active
        } else {
            ToyStatus::Inactive
        };
        self.change_status(&toy, status).await
    }

    /// 管理员审核玩具状态（仅 active / inactive）
    #[instrument(skip(self))]
    pub async fn moderate(&self, toy_id: i64, status: ToyStatus) -> Result<Toy> {
        if status == ToyStatus::Traded {
            return Err(MarketError::Validation(
                "traded 状态只能由交换审批写入".to_string(),
            ));
        }
        let toy = self
            .toy_repo
            .get_toy(toy_id)
            .await?
            .ok_or(MarketError::ToyNotFound(toy_id))?;
        let updated = self.change_status(&toy, status).await?;
        info!(toy_id = toy_id, status = %status, "管理员修改玩具状态");
        Ok(updated)
    }

    /// 物主删除玩具，有待处理申请时拒绝
    #[instrument(skip(self))]
    pub async fn delete_toy(&self, toy_id: i64, actor_id: i64) -> Result<()> {
        self.owned_toy(toy_id, actor_id).await?;

        let pending = self
            .request_repo
            .count(&RequestQuery::pending_for_toy(toy_id))
            .await?;
        if pending > 0 {
            return Err(MarketError::ToyHasPendingRequests { toy_id, pending });
        }

        if !self.toy_repo.delete_toy(toy_id).await? {
            return Err(MarketError::ToyNotFound(toy_id));
        }
        info!(toy_id = toy_id, "玩具已删除");
        Ok(())
    }

    async fn owned_toy(&self, toy_id: i64, actor_id: i64) -> Result<Toy> {
        let toy = self
            .toy_repo
            .get_toy(toy_id)
            .await?
            .ok_or(MarketError::ToyNotFound(toy_id))?;
        if !toy.is_owned_by(actor_id) {
            return Err(MarketError::NotToyOwner {
                toy_id,
                user_id: actor_id,
            });
        }
        Ok(toy)
    }

    async fn change_status(&self, toy: &Toy, status: ToyStatus) -> Result<Toy> {
        if toy.status == ToyStatus::Traded {
            return Err(MarketError::ToyUnavailable(toy.id));
        }
        if let Some(updated) = self.toy_repo.set_status(toy.id, status).await? {
            return Ok(updated);
        }

        // 条件更新未命中：玩具已被删除，或在读取之后被审批为 traded
        match self.toy_repo.get_toy(toy.id).await? {
            Some(_) => Err(MarketError::ToyUnavailable(toy.id)),
            None => Err(MarketError::ToyNotFound(toy.id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ToyCondition;
    use crate::repository::{MockToyRepositoryTrait, MockToyRequestRepositoryTrait};
    use chrono::Utc;
    use mockall::predicate::eq;

    fn test_toy(id: i64, owner_id: i64, status: ToyStatus) -> Toy {
        Toy {
            id,
            owner_id,
            title: "毛绒小熊".to_string(),
            description: "洗过晒过".to_string(),
            category: "plush".to_string(),
            age_range: "0-3".to_string(),
            condition: ToyCondition::Good,
            location: None,
            image_url: None,
            is_available: status.is_available(),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(
        toy_repo: MockToyRepositoryTrait,
        request_repo: MockToyRequestRepositoryTrait,
    ) -> ListingService<MockToyRepositoryTrait, MockToyRequestRepositoryTrait> {
        ListingService::new(Arc::new(toy_repo), Arc::new(request_repo))
    }

    #[tokio::test]
    async fn test_owner_can_toggle_availability() {
        let mut toy_repo = MockToyRepositoryTrait::new();
        toy_repo
            .expect_get_toy()
            .returning(|id| Ok(Some(test_toy(id, 1, ToyStatus::Active))));
        toy_repo
            .expect_set_status()
            .with(eq(5), eq(ToyStatus::Inactive))
            .times(1)
            .returning(|id, status| Ok(Some(test_toy(id, 1, status))));

        let toy = service(toy_repo, MockToyRequestRepositoryTrait::new())
            .set_availability(5, 1, false)
            .await
            .unwrap();
        assert_eq!(toy.status, ToyStatus::Inactive);
        assert!(!toy.is_available);
    }

    #[tokio::test]
    async fn test_non_owner_cannot_edit() {
        let mut toy_repo = MockToyRepositoryTrait::new();
        toy_repo
            .expect_get_toy()
            .returning(|id| Ok(Some(test_toy(id, 1, ToyStatus::Active))));
        toy_repo.expect_update_toy().never();

        let err = service(toy_repo, MockToyRequestRepositoryTrait::new())
            .update_toy(5, 2, ToyChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::NotToyOwner { toy_id: 5, user_id: 2 }));
    }

    #[tokio::test]
    async fn test_traded_toy_cannot_be_relisted() {
        let mut toy_repo = MockToyRepositoryTrait::new();
        toy_repo
            .expect_get_toy()
            .returning(|id| Ok(Some(test_toy(id, 1, ToyStatus::Traded))));
        toy_repo.expect_set_status().never();

        let service = service(toy_repo, MockToyRequestRepositoryTrait::new());
        assert!(matches!(
            service.set_availability(5, 1, true).await,
            Err(MarketError::ToyUnavailable(5))
        ));
        assert!(matches!(
            service.moderate(5, ToyStatus::Active).await,
            Err(MarketError::ToyUnavailable(5))
        ));
    }

    #[tokio::test]
    async fn test_relist_loses_race_with_approval() {
        let mut toy_repo = MockToyRepositoryTrait::new();
        let mut seq = mockall::Sequence::new();
        toy_repo
            .expect_get_toy()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|id| Ok(Some(test_toy(id, 1, ToyStatus::Inactive))));
        toy_repo
            .expect_set_status()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(None));
        toy_repo
            .expect_get_toy()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|id| Ok(Some(test_toy(id, 1, ToyStatus::Traded))));

        let err = service(toy_repo, MockToyRequestRepositoryTrait::new())
            .set_availability(5, 1, true)
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::ToyUnavailable(5)));
    }

    #[tokio::test]
    async fn test_status_change_on_deleted_toy() {
        let mut toy_repo = MockToyRepositoryTrait::new();
        let mut seq = mockall::Sequence::new();
        toy_repo
            .expect_get_toy()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|id| Ok(Some(test_toy(id, 1, ToyStatus::Active))));
        toy_repo
            .expect_set_status()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(None));
        toy_repo
            .expect_get_toy()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));

        let err = service(toy_repo, MockToyRequestRepositoryTrait::new())
            .moderate(5, ToyStatus::Inactive)
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::ToyNotFound(5)));
    }

    #[tokio::test]
    async fn test_moderate_rejects_traded_target() {
        let mut toy_repo = MockToyRepositoryTrait::new();
        toy_repo.expect_get_toy().never();

        let err = service(toy_repo, MockToyRequestRepositoryTrait::new())
            .moderate(5, ToyStatus::Traded)
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_blocked_by_pending_requests() {
        let mut toy_repo = MockToyRepositoryTrait::new();
        toy_repo
            .expect_get_toy()
            .returning(|id| Ok(Some(test_toy(id, 1, ToyStatus::Active))));
        toy_repo.expect_delete_toy().never();

        let mut request_repo = MockToyRequestRepositoryTrait::new();
        request_repo
            .expect_count()
            .with(eq(RequestQuery::pending_for_toy(5)))
            .returning(|_| Ok(2));

        let err = service(toy_repo, request_repo)
            .delete_toy(5, 1)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MarketError::ToyHasPendingRequests { toy_id: 5, pending: 2 }
        ));
    }

    #[tokio::test]
    async fn test_delete_without_pending_requests() {
        let mut toy_repo = MockToyRepositoryTrait::new();
        toy_repo
            .expect_get_toy()
            .returning(|id| Ok(Some(test_toy(id, 1, ToyStatus::Inactive))));
        toy_repo
            .expect_delete_toy()
            .with(eq(5))
            .times(1)
            .returning(|_| Ok(true));

        let mut request_repo = MockToyRequestRepositoryTrait::new();
        request_repo.expect_count().returning(|_| Ok(0));

        service(toy_repo, request_repo)
            .delete_toy(5, 1)
            .await
            .unwrap();
    }
}
