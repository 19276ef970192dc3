use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use super::rows::{delete_row, find_row, find_row_for_update, next_order_index, reorder_rows};
use crate::entity::corporate_value;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, CONTENT_MANAGE};
use crate::extractors::json::AppJson;
use crate::models::shared::{ReorderRequest, validate_reorder_ids};
use crate::models::value::*;
use crate::state::AppState;

async fn load_values<C: ConnectionTrait>(db: &C) -> Result<Vec<ValueResponse>, AppError> {
    let rows = corporate_value::Entity::find()
        .order_by_asc(corporate_value::Column::OrderIndex)
        .order_by_asc(corporate_value::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(ValueResponse::from).collect())
}

#[utoipa::path(
    get,
    path = "/values",
    tag = "Site",
    operation_id = "listValues",
    summary = "Corporate values",
    responses((status = 200, description = "Values in display order", body = Vec<ValueResponse>)),
)]
#[instrument(skip(state))]
pub async fn list_values(
    State(state): State<AppState>,
) -> Result<Json<Vec<ValueResponse>>, AppError> {
    Ok(Json(load_values(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Values",
    operation_id = "adminListValues",
    summary = "List corporate values",
    responses(
        (status = 200, description = "Values", body = Vec<ValueResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn admin_list_values(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ValueResponse>>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    Ok(Json(load_values(&state.db).await?))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Values",
    operation_id = "createValue",
    summary = "Create a corporate value",
    request_body = CreateValueRequest,
    responses(
        (status = 201, description = "Value created", body = ValueResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(title = %payload.title))]
pub async fn create_value(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateValueRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_create_value(&payload)?;

    let order_index = match payload.order_index {
        Some(idx) => idx,
        None => {
            next_order_index::<corporate_value::Entity, _>(
                &state.db,
                corporate_value::Column::OrderIndex,
            )
            .await?
        }
    };

    let now = chrono::Utc::now();
    let model = corporate_value::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        description: Set(payload.description.trim().to_string()),
        icon: Set(payload.icon.trim().to_string()),
        order_index: Set(order_index),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(ValueResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Values",
    operation_id = "getValue",
    summary = "Get a corporate value",
    params(("id" = i32, Path, description = "Value ID")),
    responses(
        (status = 200, description = "Value", body = ValueResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Value not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_value(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ValueResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    let model = find_row::<corporate_value::Entity, _>(&state.db, id, "Value").await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Values",
    operation_id = "updateValue",
    summary = "Update a corporate value",
    params(("id" = i32, Path, description = "Value ID")),
    request_body = UpdateValueRequest,
    responses(
        (status = 200, description = "Value updated", body = ValueResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Value not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_value(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateValueRequest>,
) -> Result<Json<ValueResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_update_value(&payload)?;

    if payload == UpdateValueRequest::default() {
        let existing = find_row::<corporate_value::Entity, _>(&state.db, id, "Value").await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;
    let existing = find_row_for_update::<corporate_value::Entity>(&txn, id, "Value").await?;
    let mut active: corporate_value::ActiveModel = existing.into();

    if let Some(ref title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(ref description) = payload.description {
        active.description = Set(description.trim().to_string());
    }
    if let Some(ref icon) = payload.icon {
        active.icon = Set(icon.trim().to_string());
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
    tag = "Values",
    operation_id = "deleteValue",
    summary = "Delete a corporate value",
    params(("id" = i32, Path, description = "Value ID")),
    responses(
        (status = 204, description = "Value deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Value not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_value(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    delete_row::<corporate_value::Entity>(&state.db, id, "Value").await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/reorder",
    tag = "Values",
    operation_id = "reorderValues",
    summary = "Reorder corporate values",
    request_body = ReorderRequest,
    responses(
        (status = 204, description = "Values reordered"),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn reorder_values(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ReorderRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_reorder_ids(&payload.ids)?;
    reorder_rows::<corporate_value::Entity>(
        &state.db,
        &payload.ids,
        corporate_value::Column::Id,
        corporate_value::Column::OrderIndex,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
