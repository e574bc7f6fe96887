//! 公开订单追踪（无需认证）

use std::sync::Arc;

use halcon_common::utils::non_empty;
use halcon_errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::domain::order::{OrderRepository, OrderStatus};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackingQuery {
    #[serde(default)]
    pub customer_number: String,
    #[serde(default)]
    pub invoice_number: String,
}

/// 追踪结果，未找到时只有 `found: false`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackingResult {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence_photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl TrackingResult {
    pub fn not_found() -> Self {
        Self::default()
    }
}

pub struct TrackingService {
    orders: Arc<dyn OrderRepository>,
}

impl TrackingService {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }

    pub async fn track(&self, query: &TrackingQuery) -> AppResult<TrackingResult> {
        let (Some(customer_number), Some(invoice_number)) = (
            non_empty(Some(&query.customer_number)),
            non_empty(Some(&query.invoice_number)),
        ) else {
            return Err(AppError::validation(
                "customer_number and invoice_number are required",
            ));
        };

        let Some(order) = self
            .orders
            .find_for_tracking(customer_number, invoice_number)
            .await?
        else {
            return Ok(TrackingResult::not_found());
        };

        Ok(TrackingResult {
            found: true,
            invoice_number: Some(order.invoice_number),
            customer_name: Some(order.customer_name),
            status: Some(order.status),
            delivery_address: Some(order.delivery_address),
            evidence_photo_url: order.evidence_photo_url,
            created_at: Some(order.created_at.format(TIMESTAMP_FORMAT).to_string()),
            updated_at: Some(order.updated_at.format(TIMESTAMP_FORMAT).to_string()),
        })
    }
}
