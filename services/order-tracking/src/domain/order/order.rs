//! 订单实体

use chrono::{DateTime, Utc};
use halcon_auth_core::Role;
use halcon_common::{OrderId, UserId, utils::non_empty};
use halcon_errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use super::{OrderStatus, TransitionError, transition};

/// 订单
///
/// 状态只能经由状态机改变；`version` 每次持久化更新递增
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub invoice_number: String,
    pub customer_name: String,
    pub customer_number: String,
    pub status: OrderStatus,
    pub delivery_address: String,
    pub notes: String,
    pub evidence_photo_url: Option<String>,
    pub is_deleted: bool,
    pub created_by: UserId,
    pub last_modified_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i64,
}

/// 一次实际发生的状态迁移
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

impl Order {
    /// 创建订单，初始状态为 Ordered
    pub fn new(
        invoice_number: &str,
        customer_name: &str,
        customer_number: &str,
        delivery_address: Option<&str>,
        notes: Option<&str>,
        created_by: UserId,
    ) -> AppResult<Self> {
        let required = |value: &str, field: &str| {
            non_empty(Some(value))
                .map(str::to_string)
                .ok_or_else(|| AppError::validation(format!("{} is required", field)))
        };

        let now = Utc::now();
        Ok(Self {
            id: OrderId::new(),
            invoice_number: required(invoice_number, "invoice_number")?,
            customer_name: required(customer_name, "customer_name")?,
            customer_number: required(customer_number, "customer_number")?,
            status: OrderStatus::Ordered,
            delivery_address: non_empty(delivery_address).unwrap_or_default().to_string(),
            notes: non_empty(notes).unwrap_or_default().to_string(),
            evidence_photo_url: None,
            is_deleted: false,
            created_by,
            last_modified_by: created_by,
            created_at: now,
            updated_at: now,
            version: 1,
        })
    }

    /// 请求迁移到 `requested`
    ///
    /// 与当前状态相同时为空操作，返回 `None`
    pub fn change_status(
        &mut self,
        requested: OrderStatus,
        role: Role,
    ) -> Result<Option<StatusChange>, TransitionError> {
        if requested == self.status {
            return Ok(None);
        }

        let from = self.status;
        self.status = transition(from, requested, role)?;
        Ok(Some(StatusChange {
            from,
            to: self.status,
        }))
    }

    /// 部分更新：只覆盖非空字段
    pub fn update_details(&mut self, delivery_address: Option<&str>, notes: Option<&str>) {
        if let Some(address) = non_empty(delivery_address) {
            self.delivery_address = address.to_string();
        }
        if let Some(notes) = non_empty(notes) {
            self.notes = notes.to_string();
        }
    }

    pub fn attach_evidence(&mut self, url: String) {
        self.evidence_photo_url = Some(url);
    }

    pub fn soft_delete(&mut self) {
        self.is_deleted = true;
    }

    /// 恢复后状态保持不变
    pub fn restore(&mut self) {
        self.is_deleted = false;
    }

    /// 记录修改人与修改时间
    pub fn touch(&mut self, by: UserId) {
        self.last_modified_by = by;
        self.updated_at = Utc::now();
    }

    /// 证据文件名 `order_{id}_{unix_ts}{ext}`
    pub fn evidence_file_name(&self, ext: &str, at: DateTime<Utc>) -> String {
        format!("order_{}_{}{}", self.id, at.timestamp(), ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> Order {
        Order::new("INV-001", "ACME", "C100", Some("Main St 1"), None, UserId::new()).unwrap()
    }

    #[test]
    fn test_new_order_defaults() {
        let order = order();
        assert_eq!(order.status, OrderStatus::Ordered);
        assert_eq!(order.created_by, order.last_modified_by);
        assert_eq!(order.delivery_address, "Main St 1");
        assert_eq!(order.notes, "");
        assert!(!order.is_deleted);
        assert!(order.evidence_photo_url.is_none());
    }

    #[test]
    fn test_required_fields() {
        let by = UserId::new();
        assert!(matches!(
            Order::new(" ", "ACME", "C100", None, None, by),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            Order::new("INV-1", "ACME", "", None, None, by),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_same_status_is_noop() {
        let mut order = order();
        assert_eq!(order.change_status(OrderStatus::Ordered, Role::Sales), Ok(None));
        assert_eq!(order.status, OrderStatus::Ordered);
    }

    #[test]
    fn test_change_status_goes_through_table() {
        let mut order = order();
        assert!(order.change_status(OrderStatus::InRoute, Role::Sales).is_err());
        assert_eq!(order.status, OrderStatus::Ordered);

        let change = order
            .change_status(OrderStatus::InProcess, Role::Warehouse)
            .unwrap();
        assert_eq!(
            change,
            Some(StatusChange {
                from: OrderStatus::Ordered,
                to: OrderStatus::InProcess
            })
        );
    }

    #[test]
    fn test_partial_update_skips_empty() {
        let mut order = order();
        order.update_details(Some(""), Some("leave at gate"));
        assert_eq!(order.delivery_address, "Main St 1");
        assert_eq!(order.notes, "leave at gate");
    }

    #[test]
    fn test_evidence_file_name() {
        let order = order();
        let at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert_eq!(
            order.evidence_file_name(".png", at),
            format!("order_{}_1700000000.png", order.id)
        );
    }
}
