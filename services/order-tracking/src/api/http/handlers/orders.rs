//! 订单

use axum::{
    Json,
    extract::{Multipart, Path, Query, State, multipart::MultipartError},
    http::StatusCode,
};
use halcon_common::utils::non_empty;
use halcon_errors::{AppError, AppResult};
use serde::Deserialize;

use super::MessageResponse;
use crate::api::http::{AppState, AuthIdentity, ValidJson, parse_order_id};
use crate::application::{
    CreateOrderCommand, EvidenceReceipt, EvidenceUpload, OrderView, UpdateOrderCommand,
};
use crate::domain::order::{OrderFilter, OrderStatus};

/// 列表查询参数，空值视为未指定
#[derive(Debug, Default, Deserialize)]
pub struct ListOrdersParams {
    pub invoice_number: Option<String>,
    pub customer_name: Option<String>,
    pub customer_number: Option<String>,
    pub status: Option<String>,
    pub include_deleted: Option<String>,
}

impl ListOrdersParams {
    fn into_filter(self) -> AppResult<OrderFilter> {
        let text = |v: Option<String>| non_empty(v.as_deref()).map(str::to_string);
        let status = non_empty(self.status.as_deref())
            .map(str::parse::<OrderStatus>)
            .transpose()?;

        Ok(OrderFilter {
            invoice_number: text(self.invoice_number),
            customer_name: text(self.customer_name),
            customer_number: text(self.customer_number),
            status,
            include_deleted: self.include_deleted.as_deref() == Some("true"),
        })
    }
}

pub async fn list(
    State(state): State<AppState>,
    AuthIdentity(identity): AuthIdentity,
    Query(params): Query<ListOrdersParams>,
) -> AppResult<Json<Vec<OrderView>>> {
    let filter = params.into_filter()?;
    Ok(Json(state.orders.list(&identity, filter).await?))
}

pub async fn get(
    State(state): State<AppState>,
    AuthIdentity(identity): AuthIdentity,
    Path(id): Path<String>,
) -> AppResult<Json<OrderView>> {
    let id = parse_order_id(&id)?;
    Ok(Json(state.orders.get(&identity, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    AuthIdentity(identity): AuthIdentity,
    ValidJson(cmd): ValidJson<CreateOrderCommand>,
) -> AppResult<(StatusCode, Json<OrderView>)> {
    let order = state.orders.create(&identity, cmd).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn update(
    State(state): State<AppState>,
    AuthIdentity(identity): AuthIdentity,
    Path(id): Path<String>,
    ValidJson(cmd): ValidJson<UpdateOrderCommand>,
) -> AppResult<Json<OrderView>> {
    let id = parse_order_id(&id)?;
    Ok(Json(state.orders.update(&identity, id, cmd).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    AuthIdentity(identity): AuthIdentity,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_order_id(&id)?;
    state.orders.delete(&identity, id).await?;
    Ok(Json(MessageResponse {
        message: "order deleted successfully",
    }))
}

pub async fn restore(
    State(state): State<AppState>,
    AuthIdentity(identity): AuthIdentity,
    Path(id): Path<String>,
) -> AppResult<Json<OrderView>> {
    let id = parse_order_id(&id)?;
    Ok(Json(state.orders.restore(&identity, id).await?))
}

/// multipart 字段：`photo`（文件），`status`（可选）
pub async fn upload_evidence(
    State(state): State<AppState>,
    AuthIdentity(identity): AuthIdentity,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> AppResult<Json<EvidenceReceipt>> {
    let id = parse_order_id(&id)?;
    // 先授权再读取上传内容
    state.orders.ensure_can_upload(&identity)?;

    let mut upload = EvidenceUpload {
        file_name: String::new(),
        bytes: Vec::new(),
        status: None,
    };

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "photo" => {
                upload.file_name = field.file_name().unwrap_or_default().to_string();
                upload.bytes = field.bytes().await.map_err(multipart_error)?.to_vec();
            }
            "status" => {
                upload.status = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    Ok(Json(state.orders.upload_evidence(&identity, id, upload).await?))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::validation("file size exceeds maximum allowed")
    } else {
        AppError::validation(format!("invalid multipart body: {}", err.body_text()))
    }
}
