//! 数据库错误映射
//!
//! SQLx 错误到 AppError 的统一转换

use halcon_errors::AppError;

/// 将 SQLx 错误转换为 AppError
///
/// `context` 描述失败的操作，仅进入日志与内部错误信息
pub fn map_sqlx_error(context: &str, e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::RowNotFound => AppError::not_found("record not found"),
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            // PostgreSQL 约束违规代码
            Some("23505") => AppError::conflict(match db_err.constraint() {
                Some(constraint) if constraint.contains("invoice") => {
                    "invoice number already exists".to_string()
                }
                Some(constraint) if constraint.contains("username") => {
                    "username already exists".to_string()
                }
                _ => "duplicate entry violates unique constraint".to_string(),
            }),
            Some("23503") => AppError::validation("foreign key constraint violation"),
            Some("23514") => AppError::validation("check constraint violation"),
            Some("23502") => AppError::validation("not null constraint violation"),
            Some("22001") => AppError::validation("string data too long"),
            Some(code) => {
                AppError::database(format!("{} ({}): {}", context, code, db_err))
            }
            None => AppError::database(format!("{}: {}", context, db_err)),
        },
        sqlx::Error::PoolTimedOut => AppError::internal("Database connection pool timeout"),
        sqlx::Error::PoolClosed => AppError::internal("Database connection pool is closed"),
        other => AppError::database(format!("{}: {}", context, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found() {
        let err = map_sqlx_error("find order", sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_pool_timeout() {
        let err = map_sqlx_error("find order", sqlx::Error::PoolTimedOut);
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_other_errors_carry_context() {
        let err = map_sqlx_error("update order", sqlx::Error::WorkerCrashed);
        match err {
            AppError::Database(msg) => assert!(msg.starts_with("update order")),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
