use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use super::rows::{delete_row, find_row, find_row_for_update, next_order_index, reorder_rows};
use crate::entity::client;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, CONTENT_MANAGE};
use crate::extractors::json::AppJson;
use crate::models::client::*;
use crate::models::shared::{ReorderRequest, normalize_optional_image_link, validate_reorder_ids};
use crate::state::AppState;

async fn load_clients<C: ConnectionTrait>(db: &C) -> Result<Vec<ClientResponse>, AppError> {
    let rows = client::Entity::find()
        .order_by_asc(client::Column::OrderIndex)
        .order_by_asc(client::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(ClientResponse::from).collect())
}

#[utoipa::path(
    get,
    path = "/clients",
    tag = "Site",
    operation_id = "listClients",
    summary = "Client logos",
    responses((status = 200, description = "Clients in display order", body = Vec<ClientResponse>)),
)]
#[instrument(skip(state))]
pub async fn list_clients(
    State(state): State<AppState>,
) -> Result<Json<Vec<ClientResponse>>, AppError> {
    Ok(Json(load_clients(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Clients",
    operation_id = "adminListClients",
    summary = "List clients",
    responses(
        (status = 200, description = "Clients", body = Vec<ClientResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn admin_list_clients(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ClientResponse>>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    Ok(Json(load_clients(&state.db).await?))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Clients",
    operation_id = "createClient",
    summary = "Add a client logo",
    request_body = CreateClientRequest,
    responses(
        (status = 201, description = "Client created", body = ClientResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_client(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateClientRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_create_client(&payload)?;

    let order_index = match payload.order_index {
        Some(idx) => idx,
        None => next_order_index::<client::Entity, _>(&state.db, client::Column::OrderIndex).await?,
    };

    let now = chrono::Utc::now();
    let model = client::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        logo_url: Set(normalize_optional_image_link(payload.logo_url)),
        order_index: Set(order_index),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(ClientResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Clients",
    operation_id = "getClient",
    summary = "Get a client",
    params(("id" = i32, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client", body = ClientResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Client not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_client(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ClientResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    let model = find_row::<client::Entity, _>(&state.db, id, "Client").await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Clients",
    operation_id = "updateClient",
    summary = "Update a client",
    params(("id" = i32, Path, description = "Client ID")),
    request_body = UpdateClientRequest,
    responses(
        (status = 200, description = "Client updated", body = ClientResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Client not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_client(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateClientRequest>,
) -> Result<Json<ClientResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_update_client(&payload)?;

    if payload == UpdateClientRequest::default() {
        let existing = find_row::<client::Entity, _>(&state.db, id, "Client").await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;
    let existing = find_row_for_update::<client::Entity>(&txn, id, "Client").await?;
    let mut active: client::ActiveModel = existing.into();

    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(logo_url) = payload.logo_url {
        active.logo_url = Set(normalize_optional_image_link(logo_url));
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
    tag = "Clients",
    operation_id = "deleteClient",
    summary = "Delete a client",
    params(("id" = i32, Path, description = "Client ID")),
    responses(
        (status = 204, description = "Client deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Client not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_client(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    delete_row::<client::Entity>(&state.db, id, "Client").await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/reorder",
    tag = "Clients",
    operation_id = "reorderClients",
    summary = "Reorder client logos",
    request_body = ReorderRequest,
    responses(
        (status = 204, description = "Clients reordered"),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn reorder_clients(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ReorderRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_reorder_ids(&payload.ids)?;
    reorder_rows::<client::Entity>(
        &state.db,
        &payload.ids,
        client::Column::Id,
        client::Column::OrderIndex,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
