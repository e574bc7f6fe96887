//! 授权检查

use halcon_auth_core::{AccessControl, Decision, Identity, Operation};
use halcon_bootstrap::record_authorization_decision;
use halcon_errors::{AppError, AppResult};
use tracing::warn;

/// 评估并记录授权决策，拒绝时返回 Forbidden
pub(crate) fn authorize(identity: &Identity, operation: Operation) -> AppResult<()> {
    let decision = AccessControl::evaluate(identity.role, operation);
    record_authorization_decision(operation.as_str(), decision.is_allowed());

    match decision {
        Decision::Allow => Ok(()),
        Decision::Deny { reason } => {
            warn!(
                user_id = %identity.user_id,
                role = %identity.role,
                operation = %operation,
                "Authorization denied"
            );
            Err(AppError::forbidden(reason))
        }
    }
}
