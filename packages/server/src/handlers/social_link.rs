use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use super::rows::{delete_row, find_row, find_row_for_update, next_order_index, reorder_rows};
use crate::entity::social_link;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, CONTENT_MANAGE};
use crate::extractors::json::AppJson;
use crate::models::shared::{ReorderRequest, validate_reorder_ids};
use crate::models::social_link::*;
use crate::state::AppState;

async fn load_social_links<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<SocialLinkResponse>, AppError> {
    let rows = social_link::Entity::find()
        .order_by_asc(social_link::Column::OrderIndex)
        .order_by_asc(social_link::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(SocialLinkResponse::from).collect())
}

#[utoipa::path(
    get,
    path = "/social-links",
    tag = "Site",
    operation_id = "listSocialLinks",
    summary = "Footer social links",
    responses((status = 200, description = "Links in display order", body = Vec<SocialLinkResponse>)),
)]
#[instrument(skip(state))]
pub async fn list_social_links(
    State(state): State<AppState>,
) -> Result<Json<Vec<SocialLinkResponse>>, AppError> {
    Ok(Json(load_social_links(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Social Links",
    operation_id = "adminListSocialLinks",
    summary = "List social links",
    responses(
        (status = 200, description = "Social links", body = Vec<SocialLinkResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn admin_list_social_links(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<SocialLinkResponse>>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    Ok(Json(load_social_links(&state.db).await?))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Social Links",
    operation_id = "createSocialLink",
    summary = "Add a social link",
    request_body = CreateSocialLinkRequest,
    responses(
        (status = 201, description = "Link created", body = SocialLinkResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(platform = %payload.platform))]
pub async fn create_social_link(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateSocialLinkRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_create_social_link(&payload)?;

    let order_index = match payload.order_index {
        Some(idx) => idx,
        None => {
            next_order_index::<social_link::Entity, _>(&state.db, social_link::Column::OrderIndex)
                .await?
        }
    };

    let now = chrono::Utc::now();
    let model = social_link::ActiveModel {
        platform: Set(payload.platform.trim().to_string()),
        url: Set(payload.url.trim().to_string()),
        icon: Set(payload.icon.trim().to_string()),
        order_index: Set(order_index),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(SocialLinkResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Social Links",
    operation_id = "getSocialLink",
    summary = "Get a social link",
    params(("id" = i32, Path, description = "Link ID")),
    responses(
        (status = 200, description = "Link", body = SocialLinkResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Link not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_social_link(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SocialLinkResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    let model = find_row::<social_link::Entity, _>(&state.db, id, "Social link").await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Social Links",
    operation_id = "updateSocialLink",
    summary = "Update a social link",
    params(("id" = i32, Path, description = "Link ID")),
    request_body = UpdateSocialLinkRequest,
    responses(
        (status = 200, description = "Link updated", body = SocialLinkResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Link not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_social_link(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateSocialLinkRequest>,
) -> Result<Json<SocialLinkResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_update_social_link(&payload)?;

    if payload == UpdateSocialLinkRequest::default() {
        let existing = find_row::<social_link::Entity, _>(&state.db, id, "Social link").await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;
    let existing = find_row_for_update::<social_link::Entity>(&txn, id, "Social link").await?;
    let mut active: social_link::ActiveModel = existing.into();

    if let Some(ref platform) = payload.platform {
        active.platform = Set(platform.trim().to_string());
    }
    if let Some(ref url) = payload.url {
        active.url = Set(url.trim().to_string());
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
    tag = "Social Links",
    operation_id = "deleteSocialLink",
    summary = "Delete a social link",
    params(("id" = i32, Path, description = "Link ID")),
    responses(
        (status = 204, description = "Link deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Link not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_social_link(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    delete_row::<social_link::Entity>(&state.db, id, "Social link").await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/reorder",
    tag = "Social Links",
    operation_id = "reorderSocialLinks",
    summary = "Reorder social links",
    request_body = ReorderRequest,
    responses(
        (status = 204, description = "Links reordered"),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn reorder_social_links(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ReorderRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_reorder_ids(&payload.ids)?;
    reorder_rows::<social_link::Entity>(
        &state.db,
        &payload.ids,
        social_link::Column::Id,
        social_link::Column::OrderIndex,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
