//! 访问控制
//!
//! 每个操作对应一个允许的角色集合（任一命中即允许）。
//! 决策只依赖调用方身份中的角色，不读取任何持久化状态。

use std::fmt;

use halcon_common::UserId;
use halcon_errors::AppError;
use serde::{Deserialize, Serialize};

use crate::Role;

/// 已认证的调用方身份
///
/// 在认证边界由校验后的令牌生成，显式传递给各服务
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub username: String,
    pub role: Role,
}

impl Identity {
    pub fn new(user_id: UserId, username: String, role: Role) -> Self {
        Self {
            user_id,
            username,
            role,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}

/// 受控操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListUsers,
    ViewUser,
    CreateUser,
    UpdateUser,
    DeleteUser,
    ViewOrders,
    CreateOrder,
    UpdateOrder,
    DeleteOrder,
    RestoreOrder,
    UploadEvidence,
}

const ADMIN_ONLY: &[Role] = &[Role::Admin];
const ORDER_EDITORS: &[Role] = &[Role::Warehouse, Role::Route, Role::Sales];
const ORDER_CURATORS: &[Role] = &[Role::Admin, Role::Sales];

impl Operation {
    /// 允许执行该操作的角色
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Operation::ListUsers
            | Operation::ViewUser
            | Operation::CreateUser
            | Operation::UpdateUser
            | Operation::DeleteUser => ADMIN_ONLY,
            Operation::ViewOrders => &Role::ALL,
            Operation::CreateOrder => &[Role::Sales],
            Operation::UpdateOrder => ORDER_EDITORS,
            Operation::DeleteOrder | Operation::RestoreOrder => ORDER_CURATORS,
            Operation::UploadEvidence => &[Role::Route],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::ListUsers => "list_users",
            Operation::ViewUser => "view_user",
            Operation::CreateUser => "create_user",
            Operation::UpdateUser => "update_user",
            Operation::DeleteUser => "delete_user",
            Operation::ViewOrders => "view_orders",
            Operation::CreateOrder => "create_order",
            Operation::UpdateOrder => "update_order",
            Operation::DeleteOrder => "delete_order",
            Operation::RestoreOrder => "restore_order",
            Operation::UploadEvidence => "upload_evidence",
        }
    }

    fn denial_reason(&self) -> &'static str {
        match self {
            Operation::UploadEvidence => "only route personnel can upload evidence",
            Operation::CreateOrder => "only sales can create orders",
            _ => "insufficient permissions",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 访问决策结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny { reason: &'static str },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// 访问控制评估器
pub struct AccessControl;

impl AccessControl {
    /// 评估角色能否执行操作
    pub fn evaluate(role: Role, operation: Operation) -> Decision {
        if operation.allowed_roles().contains(&role) {
            Decision::Allow
        } else {
            Decision::Deny {
                reason: operation.denial_reason(),
            }
        }
    }

    /// 授权检查，拒绝时返回 Forbidden
    pub fn authorize(identity: &Identity, operation: Operation) -> Result<(), AppError> {
        match Self::evaluate(identity.role, operation) {
            Decision::Allow => Ok(()),
            Decision::Deny { reason } => Err(AppError::forbidden(reason)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: Role) -> Identity {
        Identity::new(UserId::new(), "someone".to_string(), role)
    }

    #[test]
    fn test_user_management_is_admin_only() {
        for op in [
            Operation::ListUsers,
            Operation::ViewUser,
            Operation::CreateUser,
            Operation::UpdateUser,
            Operation::DeleteUser,
        ] {
            for role in Role::ALL {
                assert_eq!(
                    AccessControl::evaluate(role, op).is_allowed(),
                    role == Role::Admin,
                    "{role} / {op}"
                );
            }
        }
    }

    #[test]
    fn test_every_role_can_view_orders() {
        for role in Role::ALL {
            assert!(AccessControl::authorize(&identity(role), Operation::ViewOrders).is_ok());
        }
    }

    #[test]
    fn test_order_operations() {
        assert!(AccessControl::evaluate(Role::Sales, Operation::CreateOrder).is_allowed());
        assert!(!AccessControl::evaluate(Role::Admin, Operation::CreateOrder).is_allowed());

        for role in [Role::Warehouse, Role::Route, Role::Sales] {
            assert!(AccessControl::evaluate(role, Operation::UpdateOrder).is_allowed());
        }
        assert!(!AccessControl::evaluate(Role::Purchasing, Operation::UpdateOrder).is_allowed());
        assert!(!AccessControl::evaluate(Role::Admin, Operation::UpdateOrder).is_allowed());

        for op in [Operation::DeleteOrder, Operation::RestoreOrder] {
            assert!(AccessControl::evaluate(Role::Admin, op).is_allowed());
            assert!(AccessControl::evaluate(Role::Sales, op).is_allowed());
            assert!(!AccessControl::evaluate(Role::Warehouse, op).is_allowed());
        }
    }

    #[test]
    fn test_evidence_upload_is_route_only() {
        for role in Role::ALL {
            let result = AccessControl::authorize(&identity(role), Operation::UploadEvidence);
            if role == Role::Route {
                assert!(result.is_ok());
            } else {
                match result {
                    Err(AppError::Forbidden(msg)) => {
                        assert_eq!(msg, "only route personnel can upload evidence")
                    }
                    other => panic!("unexpected result for {role}: {other:?}"),
                }
            }
        }
    }
}
