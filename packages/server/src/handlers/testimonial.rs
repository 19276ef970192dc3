use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use super::rows::{delete_row, find_row, find_row_for_update, next_order_index, reorder_rows};
use crate::entity::testimonial;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, CONTENT_MANAGE};
use crate::extractors::json::AppJson;
use crate::models::shared::{
    ReorderRequest, normalize_optional_image_link, validate_reorder_ids,
};
use crate::models::testimonial::*;
use crate::state::AppState;

async fn load_testimonials<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<TestimonialResponse>, AppError> {
    let rows = testimonial::Entity::find()
        .order_by_asc(testimonial::Column::OrderIndex)
        .order_by_asc(testimonial::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(TestimonialResponse::from).collect())
}

#[utoipa::path(
    get,
    path = "/testimonials",
    tag = "Site",
    operation_id = "listTestimonials",
    summary = "Customer testimonials",
    responses((status = 200, description = "Testimonials in display order", body = Vec<TestimonialResponse>)),
)]
#[instrument(skip(state))]
pub async fn list_testimonials(
    State(state): State<AppState>,
) -> Result<Json<Vec<TestimonialResponse>>, AppError> {
    Ok(Json(load_testimonials(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Testimonials",
    operation_id = "adminListTestimonials",
    summary = "List testimonials",
    responses(
        (status = 200, description = "Testimonials", body = Vec<TestimonialResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn admin_list_testimonials(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<TestimonialResponse>>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    Ok(Json(load_testimonials(&state.db).await?))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Testimonials",
    operation_id = "createTestimonial",
    summary = "Create a testimonial",
    request_body = CreateTestimonialRequest,
    responses(
        (status = 201, description = "Testimonial created", body = TestimonialResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_testimonial(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateTestimonialRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_create_testimonial(&payload)?;

    let order_index = match payload.order_index {
        Some(idx) => idx,
        None => {
            next_order_index::<testimonial::Entity, _>(&state.db, testimonial::Column::OrderIndex)
                .await?
        }
    };

    let now = chrono::Utc::now();
    let model = testimonial::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        role: Set(payload.role.trim().to_string()),
        company: Set(payload.company.trim().to_string()),
        content: Set(payload.content.trim().to_string()),
        image_url: Set(normalize_optional_image_link(payload.image_url)),
        rating: Set(payload.rating),
        order_index: Set(order_index),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(TestimonialResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Testimonials",
    operation_id = "getTestimonial",
    summary = "Get a testimonial",
    params(("id" = i32, Path, description = "Testimonial ID")),
    responses(
        (status = 200, description = "Testimonial", body = TestimonialResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Testimonial not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_testimonial(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TestimonialResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    let model = find_row::<testimonial::Entity, _>(&state.db, id, "Testimonial").await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Testimonials",
    operation_id = "updateTestimonial",
    summary = "Update a testimonial",
    description = "PATCH semantics; `image_url: null` removes the photo.",
    params(("id" = i32, Path, description = "Testimonial ID")),
    request_body = UpdateTestimonialRequest,
    responses(
        (status = 200, description = "Testimonial updated", body = TestimonialResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Testimonial not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_testimonial(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateTestimonialRequest>,
) -> Result<Json<TestimonialResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_update_testimonial(&payload)?;

    if payload == UpdateTestimonialRequest::default() {
        let existing = find_row::<testimonial::Entity, _>(&state.db, id, "Testimonial").await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;
    let existing = find_row_for_update::<testimonial::Entity>(&txn, id, "Testimonial").await?;
    let mut active: testimonial::ActiveModel = existing.into();

    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(ref role) = payload.role {
        active.role = Set(role.trim().to_string());
    }
    if let Some(ref company) = payload.company {
        active.company = Set(company.trim().to_string());
    }
    if let Some(ref content) = payload.content {
        active.content = Set(content.trim().to_string());
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(normalize_optional_image_link(image_url));
    }
    if let Some(rating) = payload.rating {
        active.rating = Set(rating);
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
    tag = "Testimonials",
    operation_id = "deleteTestimonial",
    summary = "Delete a testimonial",
    params(("id" = i32, Path, description = "Testimonial ID")),
    responses(
        (status = 204, description = "Testimonial deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Testimonial not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_testimonial(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    delete_row::<testimonial::Entity>(&state.db, id, "Testimonial").await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/reorder",
    tag = "Testimonials",
    operation_id = "reorderTestimonials",
    summary = "Reorder testimonials",
    request_body = ReorderRequest,
    responses(
        (status = 204, description = "Testimonials reordered"),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn reorder_testimonials(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ReorderRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_reorder_ids(&payload.ids)?;
    reorder_rows::<testimonial::Entity>(
        &state.db,
        &payload.ids,
        testimonial::Column::Id,
        testimonial::Column::OrderIndex,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
