//! 订单服务

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use halcon_auth_core::{Identity, Operation, Role};
use halcon_bootstrap::record_order_transition;
use halcon_common::{OrderId, UserId, utils::non_empty};
use halcon_errors::{AppError, AppResult};
use halcon_ports::{BlobStore, UploadPolicy};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::access::authorize;
use crate::domain::order::{
    DeletionState, Order, OrderFilter, OrderRepository, OrderStatus, StatusChange,
};
use crate::domain::user::{UserRepository, UserSummary};

/// 创建订单请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateOrderCommand {
    #[serde(default)]
    pub invoice_number: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_number: String,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
}

/// 更新订单请求，缺省或空字段不修改
///
/// `status` 保留原始文本，空串等同缺省，授权之后再解析
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOrderCommand {
    pub status: Option<String>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
}

/// 证据照片上传
#[derive(Debug, Clone)]
pub struct EvidenceUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub status: Option<String>,
}

/// 带创建人/修改人摘要的订单
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub created_by_user: Option<UserSummary>,
    pub last_modified_by_user: Option<UserSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvidenceReceipt {
    pub url: String,
    pub order: OrderView,
}

/// 订单服务
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    users: Arc<dyn UserRepository>,
    blobs: Arc<dyn BlobStore>,
    upload_policy: UploadPolicy,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        users: Arc<dyn UserRepository>,
        blobs: Arc<dyn BlobStore>,
        upload_policy: UploadPolicy,
    ) -> Self {
        Self {
            orders,
            users,
            blobs,
            upload_policy,
        }
    }

    /// 订单列表
    ///
    /// Purchasing 只能看到 In Process 的订单，与其他过滤条件取交集
    pub async fn list(&self, identity: &Identity, mut filter: OrderFilter) -> AppResult<Vec<OrderView>> {
        authorize(identity, Operation::ViewOrders)?;

        if identity.has_role(Role::Purchasing) && !filter.narrow_to(OrderStatus::InProcess) {
            return Ok(Vec::new());
        }

        let orders = self.orders.list(&filter).await?;
        self.with_users(orders).await
    }

    pub async fn get(&self, identity: &Identity, id: OrderId) -> AppResult<OrderView> {
        authorize(identity, Operation::ViewOrders)?;

        let order = self.load(id, DeletionState::Active).await?;
        if identity.has_role(Role::Purchasing) && order.status != OrderStatus::InProcess {
            return Err(order_not_found());
        }

        self.view(order).await
    }

    pub async fn create(&self, identity: &Identity, cmd: CreateOrderCommand) -> AppResult<OrderView> {
        authorize(identity, Operation::CreateOrder)?;

        let order = Order::new(
            &cmd.invoice_number,
            &cmd.customer_name,
            &cmd.customer_number,
            cmd.delivery_address.as_deref(),
            cmd.notes.as_deref(),
            identity.user_id,
        )?;

        if self.orders.exists_by_invoice_number(&order.invoice_number).await? {
            return Err(AppError::conflict("invoice number already exists"));
        }

        self.orders.create(&order).await?;
        info!(
            order_id = %order.id,
            invoice_number = %order.invoice_number,
            created_by = %identity.user_id,
            "Order created"
        );

        self.view(order).await
    }

    pub async fn update(
        &self,
        identity: &Identity,
        id: OrderId,
        cmd: UpdateOrderCommand,
    ) -> AppResult<OrderView> {
        authorize(identity, Operation::UpdateOrder)?;

        let mut order = self.load(id, DeletionState::Active).await?;

        let change = match requested_status(cmd.status.as_deref())? {
            Some(requested) => order.change_status(requested, identity.role)?,
            None => None,
        };
        order.update_details(cmd.delivery_address.as_deref(), cmd.notes.as_deref());
        order.touch(identity.user_id);

        self.orders.update(&order).await?;
        if let Some(change) = change {
            record_change(&order, change, identity.role);
        }

        self.reload(id, DeletionState::Active).await
    }

    /// 软删除，已删除的订单视为不存在
    pub async fn delete(&self, identity: &Identity, id: OrderId) -> AppResult<()> {
        authorize(identity, Operation::DeleteOrder)?;

        let mut order = self.load(id, DeletionState::Active).await?;
        order.soft_delete();
        order.touch(identity.user_id);
        self.orders.update(&order).await?;

        info!(order_id = %order.id, deleted_by = %identity.user_id, "Order soft-deleted");
        Ok(())
    }

    /// 恢复已删除订单，状态保持不变
    pub async fn restore(&self, identity: &Identity, id: OrderId) -> AppResult<OrderView> {
        authorize(identity, Operation::RestoreOrder)?;

        let mut order = self
            .orders
            .find_by_id(&id, DeletionState::Deleted)
            .await?
            .ok_or_else(|| AppError::not_found("deleted order not found"))?;
        order.restore();
        order.touch(identity.user_id);
        self.orders.update(&order).await?;

        info!(order_id = %order.id, restored_by = %identity.user_id, "Order restored");
        self.reload(id, DeletionState::Active).await
    }

    /// 证据上传的前置授权，HTTP 层在读取请求体之前调用
    pub fn ensure_can_upload(&self, identity: &Identity) -> AppResult<()> {
        authorize(identity, Operation::UploadEvidence)
    }

    /// 上传送达证据
    ///
    /// 文件校验与状态迁移都在写入存储之前完成
    pub async fn upload_evidence(
        &self,
        identity: &Identity,
        id: OrderId,
        upload: EvidenceUpload,
    ) -> AppResult<EvidenceReceipt> {
        authorize(identity, Operation::UploadEvidence)?;

        let mut order = self.load(id, DeletionState::Active).await?;
        let ext = self
            .upload_policy
            .check(&upload.file_name, upload.bytes.len() as u64)?;

        let change = match requested_status(upload.status.as_deref())? {
            Some(requested) => order.change_status(requested, identity.role)?,
            None => None,
        };

        let name = order.evidence_file_name(&ext, Utc::now());
        let url = self.blobs.put(&name, &upload.bytes).await?;
        order.attach_evidence(url.clone());
        order.touch(identity.user_id);

        if let Err(err) = self.orders.update(&order).await {
            self.discard_blob(&name).await;
            return Err(err);
        }
        info!(order_id = %order.id, url = %url, "Evidence attached");
        if let Some(change) = change {
            record_change(&order, change, identity.role);
        }

        Ok(EvidenceReceipt {
            url,
            order: self.reload(id, DeletionState::Active).await?,
        })
    }

    /// 订单未能持久化时删除已写入的证据文件
    async fn discard_blob(&self, name: &str) {
        match self.blobs.delete(name).await {
            Ok(()) => info!(name = %name, "Discarded evidence of failed update"),
            Err(e) => warn!(name = %name, error = %e, "Orphaned evidence file left in storage"),
        }
    }

    async fn load(&self, id: OrderId, state: DeletionState) -> AppResult<Order> {
        self.orders
            .find_by_id(&id, state)
            .await?
            .ok_or_else(order_not_found)
    }

    async fn reload(&self, id: OrderId, state: DeletionState) -> AppResult<OrderView> {
        let order = self.load(id, state).await?;
        self.view(order).await
    }

    async fn view(&self, order: Order) -> AppResult<OrderView> {
        let mut views = self.with_users(vec![order]).await?;
        views.pop().ok_or_else(order_not_found)
    }

    /// 批量补全创建人/修改人摘要
    async fn with_users(&self, orders: Vec<Order>) -> AppResult<Vec<OrderView>> {
        let ids: Vec<UserId> = orders
            .iter()
            .flat_map(|o| [o.created_by, o.last_modified_by])
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let users: HashMap<UserId, UserSummary> = if ids.is_empty() {
            HashMap::new()
        } else {
            self.users
                .find_by_ids(&ids)
                .await?
                .iter()
                .map(|u| (u.id, u.summary()))
                .collect()
        };

        Ok(orders
            .into_iter()
            .map(|order| OrderView {
                created_by_user: users.get(&order.created_by).cloned(),
                last_modified_by_user: users.get(&order.last_modified_by).cloned(),
                order,
            })
            .collect())
    }
}

/// 解析请求中的目标状态，空白视为未指定
fn requested_status(raw: Option<&str>) -> AppResult<Option<OrderStatus>> {
    non_empty(raw).map(str::parse::<OrderStatus>).transpose()
}

fn order_not_found() -> AppError {
    AppError::not_found("order not found")
}

fn record_change(order: &Order, change: StatusChange, role: Role) {
    record_order_transition(change.from.as_str(), change.to.as_str(), role.as_str());
    info!(
        order_id = %order.id,
        invoice_number = %order.invoice_number,
        from = %change.from,
        to = %change.to,
        role = %role,
        "Order status changed"
    );
}
