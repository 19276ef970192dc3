use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use super::rows::{delete_row, find_row, find_row_for_update, next_order_index, reorder_rows};
use crate::entity::service;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, CONTENT_MANAGE};
use crate::extractors::json::{AppJson, AppQuery};
use crate::models::service::*;
use crate::models::shared::{ReorderRequest, normalize_optional_image_link, validate_reorder_ids};
use crate::state::AppState;

async fn load_services<C: ConnectionTrait>(
    db: &C,
    home_only: bool,
) -> Result<Vec<ServiceResponse>, AppError> {
    let mut select = service::Entity::find();
    if home_only {
        select = select.filter(service::Column::ShowInHome.eq(true));
    }
    let services = select
        .order_by_asc(service::Column::OrderIndex)
        .order_by_asc(service::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(services.into_iter().map(ServiceResponse::from).collect())
}

#[utoipa::path(
    get,
    path = "/services",
    tag = "Site",
    operation_id = "listServices",
    summary = "Services catalogue",
    description = "All services in display order. With `home=true`, only those flagged for the home-page preview.",
    params(ServiceListQuery),
    responses(
        (status = 200, description = "Services", body = Vec<ServiceResponse>),
        (status = 400, description = "Malformed query (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(home = ?query.home))]
pub async fn list_services(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ServiceListQuery>,
) -> Result<Json<Vec<ServiceResponse>>, AppError> {
    let home_only = query.home.unwrap_or(false);
    Ok(Json(load_services(&state.db, home_only).await?))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Services",
    operation_id = "adminListServices",
    summary = "List services",
    responses(
        (status = 200, description = "Services", body = Vec<ServiceResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn admin_list_services(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ServiceResponse>>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    Ok(Json(load_services(&state.db, false).await?))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Services",
    operation_id = "createService",
    summary = "Create a service",
    description = "Requires `content:manage`.",
    request_body = CreateServiceRequest,
    responses(
        (status = 201, description = "Service created", body = ServiceResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(title = %payload.title))]
pub async fn create_service(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateServiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_create_service(&payload)?;

    let order_index = match payload.order_index {
        Some(idx) => idx,
        None => next_order_index::<service::Entity, _>(&state.db, service::Column::OrderIndex).await?,
    };

    let now = chrono::Utc::now();
    let model = service::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        description: Set(payload.description.trim().to_string()),
        image_url: Set(normalize_optional_image_link(payload.image_url)),
        icon: Set(payload.icon.trim().to_string()),
        show_in_home: Set(payload.show_in_home),
        order_index: Set(order_index),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(ServiceResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Services",
    operation_id = "getService",
    summary = "Get a service",
    params(("id" = i32, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service", body = ServiceResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Service not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_service(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ServiceResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    let model = find_row::<service::Entity, _>(&state.db, id, "Service").await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Services",
    operation_id = "updateService",
    summary = "Update a service",
    description = "PATCH semantics; an empty payload returns the current service unchanged.",
    params(("id" = i32, Path, description = "Service ID")),
    request_body = UpdateServiceRequest,
    responses(
        (status = 200, description = "Service updated", body = ServiceResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Service not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_service(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateServiceRequest>,
) -> Result<Json<ServiceResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_update_service(&payload)?;

    if payload == UpdateServiceRequest::default() {
        let existing = find_row::<service::Entity, _>(&state.db, id, "Service").await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;
    let existing = find_row_for_update::<service::Entity>(&txn, id, "Service").await?;
    let mut active: service::ActiveModel = existing.into();

    if let Some(ref title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(ref description) = payload.description {
        active.description = Set(description.trim().to_string());
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(normalize_optional_image_link(image_url));
    }
    if let Some(ref icon) = payload.icon {
        active.icon = Set(icon.trim().to_string());
    }
    if let Some(show_in_home) = payload.show_in_home {
        active.show_in_home = Set(show_in_home);
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
    tag = "Services",
    operation_id = "deleteService",
    summary = "Delete a service",
    params(("id" = i32, Path, description = "Service ID")),
    responses(
        (status = 204, description = "Service deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Service not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_service(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    delete_row::<service::Entity>(&state.db, id, "Service").await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/reorder",
    tag = "Services",
    operation_id = "reorderServices",
    summary = "Reorder services",
    request_body = ReorderRequest,
    responses(
        (status = 204, description = "Services reordered"),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn reorder_services(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ReorderRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_reorder_ids(&payload.ids)?;
    reorder_rows::<service::Entity>(
        &state.db,
        &payload.ids,
        service::Column::Id,
        service::Column::OrderIndex,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
