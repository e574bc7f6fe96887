//! PostgreSQL 订单仓储实现

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use halcon_adapter_postgres::map_sqlx_error;
use halcon_common::{OrderId, UserId};
use halcon_errors::{AppError, AppResult};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::order::{DeletionState, Order, OrderFilter, OrderRepository};

const ORDER_COLUMNS: &str = r#"
    id, invoice_number, customer_name, customer_number, status, delivery_address, notes,
    evidence_photo_url, is_deleted, created_by, last_modified_by, created_at, updated_at, version
"#;

pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// ILIKE 模式，转义通配符
fn contains_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn create(&self, order: &Order) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO orders (id, invoice_number, customer_name, customer_number, status,
                                delivery_address, notes, evidence_photo_url, is_deleted,
                                created_by, last_modified_by, created_at, updated_at, version)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(order.id.0)
        .bind(&order.invoice_number)
        .bind(&order.customer_name)
        .bind(&order.customer_number)
        .bind(order.status.as_str())
        .bind(&order.delivery_address)
        .bind(&order.notes)
        .bind(&order.evidence_photo_url)
        .bind(order.is_deleted)
        .bind(order.created_by.0)
        .bind(order.last_modified_by.0)
        .bind(order.created_at)
        .bind(order.updated_at)
        .bind(order.version)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create order", e))?;

        Ok(())
    }

    async fn update(&self, order: &Order) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = $3, delivery_address = $4, notes = $5, evidence_photo_url = $6,
                is_deleted = $7, last_modified_by = $8, updated_at = $9, version = version + 1
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(order.id.0)
        .bind(order.version)
        .bind(order.status.as_str())
        .bind(&order.delivery_address)
        .bind(&order.notes)
        .bind(&order.evidence_photo_url)
        .bind(order.is_deleted)
        .bind(order.last_modified_by.0)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update order", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::conflict("order was modified concurrently"));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &OrderId, state: DeletionState) -> AppResult<Option<Order>> {
        let sql = format!(
            "SELECT {} FROM orders WHERE id = $1 AND is_deleted = $2",
            ORDER_COLUMNS
        );
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id.0)
            .bind(state == DeletionState::Deleted)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find order", e))?;

        row.map(OrderRow::into_order).transpose()
    }

    async fn find_for_tracking(
        &self,
        customer_number: &str,
        invoice_number: &str,
    ) -> AppResult<Option<Order>> {
        let sql = format!(
            r#"
            SELECT {} FROM orders
            WHERE customer_number = $1 AND invoice_number = $2 AND is_deleted = FALSE
            "#,
            ORDER_COLUMNS
        );
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(customer_number)
            .bind(invoice_number)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("track order", e))?;

        row.map(OrderRow::into_order).transpose()
    }

    async fn list(&self, filter: &OrderFilter) -> AppResult<Vec<Order>> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM orders WHERE is_deleted = ", ORDER_COLUMNS));
        query.push_bind(filter.deletion_state() == DeletionState::Deleted);

        let text_filters = [
            ("invoice_number", &filter.invoice_number),
            ("customer_name", &filter.customer_name),
            ("customer_number", &filter.customer_number),
        ];
        for (column, value) in text_filters {
            if let Some(value) = value {
                query
                    .push(format!(" AND {} ILIKE ", column))
                    .push_bind(contains_pattern(value));
            }
        }
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status.as_str());
        }
        query.push(" ORDER BY created_at DESC");

        let rows = query
            .build_query_as::<OrderRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list orders", e))?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    async fn exists_by_invoice_number(&self, invoice_number: &str) -> AppResult<bool> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM orders WHERE invoice_number = $1)")
                .bind(invoice_number)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("check invoice number", e))?;

        Ok(row.0)
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    invoice_number: String,
    customer_name: String,
    customer_number: String,
    status: String,
    delivery_address: String,
    notes: String,
    evidence_photo_url: Option<String>,
    is_deleted: bool,
    created_by: Uuid,
    last_modified_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: i64,
}

impl OrderRow {
    fn into_order(self) -> AppResult<Order> {
        let status = self
            .status
            .parse()
            .map_err(|_| AppError::database(format!("Invalid order status: {}", self.status)))?;

        Ok(Order {
            id: OrderId::from_uuid(self.id),
            invoice_number: self.invoice_number,
            customer_name: self.customer_name,
            customer_number: self.customer_number,
            status,
            delivery_address: self.delivery_address,
            notes: self.notes,
            evidence_photo_url: self.evidence_photo_url,
            is_deleted: self.is_deleted,
            created_by: UserId::from_uuid(self.created_by),
            last_modified_by: UserId::from_uuid(self.last_modified_by),
            created_at: self.created_at,
            updated_at: self.updated_at,
            version: self.version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("INV"), "%INV%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
    }
}
