use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use super::rows::{delete_row, find_row, find_row_for_update, next_order_index, reorder_rows};
use crate::entity::payment_method;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, CONTENT_MANAGE};
use crate::extractors::json::AppJson;
use crate::models::payment_method::*;
use crate::models::shared::{ReorderRequest, validate_reorder_ids};
use crate::state::AppState;

async fn load_payment_methods<C: ConnectionTrait>(
    db: &C,
    active_only: bool,
) -> Result<Vec<PaymentMethodResponse>, AppError> {
    let mut select = payment_method::Entity::find();
    if active_only {
        select = select.filter(payment_method::Column::IsActive.eq(true));
    }
    let rows = select
        .order_by_asc(payment_method::Column::OrderIndex)
        .order_by_asc(payment_method::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(PaymentMethodResponse::from).collect())
}

#[utoipa::path(
    get,
    path = "/payment-methods",
    tag = "Site",
    operation_id = "listPaymentMethods",
    summary = "Active payment methods",
    description = "Inactive methods are hidden.",
    responses((status = 200, description = "Active methods in display order", body = Vec<PaymentMethodResponse>)),
)]
#[instrument(skip(state))]
pub async fn list_payment_methods(
    State(state): State<AppState>,
) -> Result<Json<Vec<PaymentMethodResponse>>, AppError> {
    Ok(Json(load_payment_methods(&state.db, true).await?))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Payment Methods",
    operation_id = "adminListPaymentMethods",
    summary = "List payment methods",
    description = "Includes inactive methods.",
    responses(
        (status = 200, description = "All payment methods", body = Vec<PaymentMethodResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn admin_list_payment_methods(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<PaymentMethodResponse>>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    Ok(Json(load_payment_methods(&state.db, false).await?))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Payment Methods",
    operation_id = "createPaymentMethod",
    summary = "Create a payment method",
    request_body = CreatePaymentMethodRequest,
    responses(
        (status = 201, description = "Payment method created", body = PaymentMethodResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_payment_method(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePaymentMethodRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_create_payment_method(&payload)?;

    let order_index = match payload.order_index {
        Some(idx) => idx,
        None => {
            next_order_index::<payment_method::Entity, _>(
                &state.db,
                payment_method::Column::OrderIndex,
            )
            .await?
        }
    };

    let now = chrono::Utc::now();
    let model = payment_method::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description.trim().to_string()),
        account_info: Set(payload.account_info.trim().to_string()),
        icon: Set(payload.icon.trim().to_string()),
        is_active: Set(payload.is_active),
        order_index: Set(order_index),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(PaymentMethodResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Payment Methods",
    operation_id = "getPaymentMethod",
    summary = "Get a payment method",
    params(("id" = i32, Path, description = "Payment method ID")),
    responses(
        (status = 200, description = "Payment method", body = PaymentMethodResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Payment method not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_payment_method(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PaymentMethodResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    let model = find_row::<payment_method::Entity, _>(&state.db, id, "Payment method").await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Payment Methods",
    operation_id = "updatePaymentMethod",
    summary = "Update a payment method",
    description = "PATCH semantics. Set `is_active: false` to hide the method from the site without deleting it.",
    params(("id" = i32, Path, description = "Payment method ID")),
    request_body = UpdatePaymentMethodRequest,
    responses(
        (status = 200, description = "Payment method updated", body = PaymentMethodResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Payment method not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_payment_method(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdatePaymentMethodRequest>,
) -> Result<Json<PaymentMethodResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_update_payment_method(&payload)?;

    if payload == UpdatePaymentMethodRequest::default() {
        let existing =
            find_row::<payment_method::Entity, _>(&state.db, id, "Payment method").await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;
    let existing =
        find_row_for_update::<payment_method::Entity>(&txn, id, "Payment method").await?;
    let mut active: payment_method::ActiveModel = existing.into();

    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(ref description) = payload.description {
        active.description = Set(description.trim().to_string());
    }
    if let Some(ref account_info) = payload.account_info {
        active.account_info = Set(account_info.trim().to_string());
    }
    if let Some(ref icon) = payload.icon {
        active.icon = Set(icon.trim().to_string());
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(order_index) = payload.order_index {
        active.order_index = Set(order_index);
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Payment Methods",
    operation_id = "deletePaymentMethod",
    summary = "Delete a payment method",
    params(("id" = i32, Path, description = "Payment method ID")),
    responses(
        (status = 204, description = "Payment method deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Payment method not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_payment_method(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    delete_row::<payment_method::Entity>(&state.db, id, "Payment method").await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/reorder",
    tag = "Payment Methods",
    operation_id = "reorderPaymentMethods",
    summary = "Reorder payment methods",
    request_body = ReorderRequest,
    responses(
        (status = 204, description = "Payment methods reordered"),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn reorder_payment_methods(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ReorderRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_reorder_ids(&payload.ids)?;
    reorder_rows::<payment_method::Entity>(
        &state.db,
        &payload.ids,
        payment_method::Column::Id,
        payment_method::Column::OrderIndex,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
