//! 订单仓储接口

use async_trait::async_trait;
use halcon_common::OrderId;
use halcon_errors::AppResult;

use super::{Order, OrderStatus};

/// 软删除维度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionState {
    Active,
    Deleted,
}

/// 列表过滤条件
///
/// 文本字段为大小写不敏感的子串匹配；`include_deleted` 为 true 时只返回已删除订单
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub invoice_number: Option<String>,
    pub customer_name: Option<String>,
    pub customer_number: Option<String>,
    pub status: Option<OrderStatus>,
    pub include_deleted: bool,
}

impl OrderFilter {
    pub fn deletion_state(&self) -> DeletionState {
        if self.include_deleted {
            DeletionState::Deleted
        } else {
            DeletionState::Active
        }
    }

    /// 收窄到单一状态
    ///
    /// 调用方已指定其他状态时结果必为空，返回 false
    pub fn narrow_to(&mut self, status: OrderStatus) -> bool {
        match self.status {
            Some(requested) if requested != status => false,
            _ => {
                self.status = Some(status);
                true
            }
        }
    }
}

/// 订单仓储接口
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// 创建订单，发票号重复时返回 Conflict
    async fn create(&self, order: &Order) -> AppResult<()>;

    /// 以 `order.version` 为期望版本更新，版本不符时返回 Conflict
    async fn update(&self, order: &Order) -> AppResult<()>;

    async fn find_by_id(&self, id: &OrderId, state: DeletionState) -> AppResult<Option<Order>>;

    /// 公开查询：客户号与发票号精确匹配，排除已删除订单
    async fn find_for_tracking(
        &self,
        customer_number: &str,
        invoice_number: &str,
    ) -> AppResult<Option<Order>>;

    /// 按创建时间倒序
    async fn list(&self, filter: &OrderFilter) -> AppResult<Vec<Order>>;

    async fn exists_by_invoice_number(&self, invoice_number: &str) -> AppResult<bool>;
}
