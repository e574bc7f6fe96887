//! 订单状态机
//!
//! 迁移表是唯一的事实来源：(当前状态, 角色) → 允许的目标状态。
//! 纯函数，无 I/O；普通更新与证据上传共用同一套规则。

use halcon_auth_core::Role;
use halcon_errors::AppError;
use thiserror::Error;

use super::OrderStatus;

/// 迁移规则
#[derive(Debug)]
pub struct TransitionRule {
    pub from: OrderStatus,
    pub role: Role,
    pub to: &'static [OrderStatus],
}

/// 迁移表（进程生命周期内不变）
///
/// Delivered 没有任何出边，是终态
pub static TRANSITIONS: &[TransitionRule] = &[
    TransitionRule {
        from: OrderStatus::Ordered,
        role: Role::Warehouse,
        to: &[OrderStatus::InProcess],
    },
    TransitionRule {
        from: OrderStatus::InProcess,
        role: Role::Warehouse,
        to: &[OrderStatus::InRoute],
    },
    TransitionRule {
        from: OrderStatus::InRoute,
        role: Role::Route,
        to: &[OrderStatus::Delivered],
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("role {role} cannot change status from {from}")]
    RoleNotPermittedForState { from: OrderStatus, role: Role },

    #[error("invalid status transition from {from} to {to} for role {role}")]
    IllegalTransition {
        from: OrderStatus,
        to: OrderStatus,
        role: Role,
    },
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        AppError::forbidden(err.to_string())
    }
}

/// 角色在当前状态下可迁往的状态，无规则时为空
pub fn allowed_targets(current: OrderStatus, role: Role) -> &'static [OrderStatus] {
    TRANSITIONS
        .iter()
        .find(|rule| rule.from == current && rule.role == role)
        .map(|rule| rule.to)
        .unwrap_or(&[])
}

/// 校验迁移并返回新状态
///
/// `requested == current` 的空操作由调用方提前短路
pub fn transition(
    current: OrderStatus,
    requested: OrderStatus,
    role: Role,
) -> Result<OrderStatus, TransitionError> {
    let targets = allowed_targets(current, role);
    if targets.is_empty() {
        return Err(TransitionError::RoleNotPermittedForState {
            from: current,
            role,
        });
    }

    if targets.contains(&requested) {
        Ok(requested)
    } else {
        Err(TransitionError::IllegalTransition {
            from: current,
            to: requested,
            role,
        })
    }
}
