use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use super::rows::{delete_row, find_row, find_row_for_update, next_order_index, reorder_rows};
use crate::entity::hero_slide;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, CONTENT_MANAGE};
use crate::extractors::json::AppJson;
use crate::models::hero_slide::*;
use crate::models::shared::{ReorderRequest, normalize_optional_image_link, validate_reorder_ids};
use crate::state::AppState;

async fn load_hero_slides<C: ConnectionTrait>(db: &C) -> Result<Vec<HeroSlideResponse>, AppError> {
    let slides = hero_slide::Entity::find()
        .order_by_asc(hero_slide::Column::OrderIndex)
        .order_by_asc(hero_slide::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(slides.into_iter().map(HeroSlideResponse::from).collect())
}

#[utoipa::path(
    get,
    path = "/hero-slides",
    tag = "Site",
    operation_id = "listHeroSlides",
    summary = "Landing-page carousel",
    responses((status = 200, description = "Slides in display order", body = Vec<HeroSlideResponse>)),
)]
#[instrument(skip(state))]
pub async fn list_hero_slides(
    State(state): State<AppState>,
) -> Result<Json<Vec<HeroSlideResponse>>, AppError> {
    Ok(Json(load_hero_slides(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Hero Slides",
    operation_id = "adminListHeroSlides",
    summary = "List hero slides",
    responses(
        (status = 200, description = "Slides in display order", body = Vec<HeroSlideResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn admin_list_hero_slides(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<HeroSlideResponse>>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    Ok(Json(load_hero_slides(&state.db).await?))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Hero Slides",
    operation_id = "createHeroSlide",
    summary = "Create a hero slide",
    description = "Requires `content:manage`. Appended to the end of the carousel unless `order_index` is given.",
    request_body = CreateHeroSlideRequest,
    responses(
        (status = 201, description = "Slide created", body = HeroSlideResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(title = %payload.title))]
pub async fn create_hero_slide(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateHeroSlideRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_create_hero_slide(&payload)?;

    let order_index = match payload.order_index {
        Some(idx) => idx,
        None => next_order_index::<hero_slide::Entity, _>(&state.db, hero_slide::Column::OrderIndex)
            .await?,
    };

    let now = chrono::Utc::now();
    let model = hero_slide::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        highlight: Set(payload.highlight.trim().to_string()),
        description: Set(payload.description.trim().to_string()),
        image_url: Set(normalize_optional_image_link(payload.image_url)),
        order_index: Set(order_index),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(HeroSlideResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Hero Slides",
    operation_id = "getHeroSlide",
    summary = "Get a hero slide",
    params(("id" = i32, Path, description = "Slide ID")),
    responses(
        (status = 200, description = "Slide", body = HeroSlideResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Slide not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_hero_slide(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<HeroSlideResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    let model = find_row::<hero_slide::Entity, _>(&state.db, id, "Hero slide").await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Hero Slides",
    operation_id = "updateHeroSlide",
    summary = "Update a hero slide",
    description = "PATCH semantics; an empty payload returns the current slide unchanged.",
    params(("id" = i32, Path, description = "Slide ID")),
    request_body = UpdateHeroSlideRequest,
    responses(
        (status = 200, description = "Slide updated", body = HeroSlideResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Slide not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_hero_slide(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateHeroSlideRequest>,
) -> Result<Json<HeroSlideResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_update_hero_slide(&payload)?;

    if payload == UpdateHeroSlideRequest::default() {
        let existing = find_row::<hero_slide::Entity, _>(&state.db, id, "Hero slide").await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;
    let existing = find_row_for_update::<hero_slide::Entity>(&txn, id, "Hero slide").await?;
    let mut active: hero_slide::ActiveModel = existing.into();

    if let Some(ref title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(ref highlight) = payload.highlight {
        active.highlight = Set(highlight.trim().to_string());
    }
    if let Some(ref description) = payload.description {
        active.description = Set(description.trim().to_string());
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(normalize_optional_image_link(image_url));
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
    tag = "Hero Slides",
    operation_id = "deleteHeroSlide",
    summary = "Delete a hero slide",
    params(("id" = i32, Path, description = "Slide ID")),
    responses(
        (status = 204, description = "Slide deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Slide not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_hero_slide(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    delete_row::<hero_slide::Entity>(&state.db, id, "Hero slide").await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/reorder",
    tag = "Hero Slides",
    operation_id = "reorderHeroSlides",
    summary = "Reorder the carousel",
    description = "The ID array must contain exactly all slides. `order_index` is assigned by array index starting at 0.",
    request_body = ReorderRequest,
    responses(
        (status = 204, description = "Slides reordered"),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn reorder_hero_slides(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ReorderRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_reorder_ids(&payload.ids)?;
    reorder_rows::<hero_slide::Entity>(
        &state.db,
        &payload.ids,
        hero_slide::Column::Id,
        hero_slide::Column::OrderIndex,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
