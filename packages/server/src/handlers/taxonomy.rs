use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::*;
use tracing::instrument;

use super::rows::{find_row, find_row_for_update};
use crate::entity::{keyword, template, template_category, template_keyword};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, CONTENT_MANAGE};
use crate::extractors::json::AppJson;
use crate::models::taxonomy::*;
use crate::state::AppState;

const CATEGORY_TAKEN: &str = "A category with this name already exists";
const KEYWORD_TAKEN: &str = "This keyword already exists";

async fn load_categories<C: ConnectionTrait>(db: &C) -> Result<Vec<CategoryResponse>, AppError> {
    let rows = template_category::Entity::find()
        .order_by_asc(template_category::Column::Name)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(CategoryResponse::from).collect())
}

async fn load_keywords<C: ConnectionTrait>(db: &C) -> Result<Vec<KeywordResponse>, AppError> {
    let rows = keyword::Entity::find()
        .order_by_asc(keyword::Column::Name)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(KeywordResponse::from).collect())
}

#[utoipa::path(
    get,
    path = "/categories",
    tag = "Site",
    operation_id = "listCategories",
    summary = "Template categories",
    responses((status = 200, description = "Categories ordered by name", body = Vec<CategoryResponse>)),
)]
#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    Ok(Json(load_categories(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Categories",
    operation_id = "adminListCategories",
    summary = "List template categories",
    responses(
        (status = 200, description = "Categories ordered by name", body = Vec<CategoryResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn admin_list_categories(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    Ok(Json(load_categories(&state.db).await?))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Categories",
    operation_id = "createCategory",
    summary = "Create a template category",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 409, description = "Name already used (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_category(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_create_category(&payload)?;

    let model = template_category::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        icon: Set(payload.icon.trim().to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| AppError::from_write(e, CATEGORY_TAKEN))?;

    Ok((StatusCode::CREATED, Json(CategoryResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Categories",
    operation_id = "getCategory",
    summary = "Get a template category",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category", body = CategoryResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_category(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CategoryResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    let model = find_row::<template_category::Entity, _>(&state.db, id, "Category").await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Categories",
    operation_id = "updateCategory",
    summary = "Update a template category",
    params(("id" = i32, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Name already used (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_category(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateCategoryRequest>,
) -> Result<Json<CategoryResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_update_category(&payload)?;

    if payload == UpdateCategoryRequest::default() {
        let existing = find_row::<template_category::Entity, _>(&state.db, id, "Category").await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;
    let existing = find_row_for_update::<template_category::Entity>(&txn, id, "Category").await?;
    let mut active: template_category::ActiveModel = existing.into();

    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(ref icon) = payload.icon {
        active.icon = Set(icon.trim().to_string());
    }

    let model = active
        .update(&txn)
        .await
        .map_err(|e| AppError::from_write(e, CATEGORY_TAKEN))?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Categories",
    operation_id = "deleteCategory",
    summary = "Delete a template category",
    description = "Templates in the category are kept and become uncategorized.",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_category(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;

    let txn = state.db.begin().await?;
    find_row_for_update::<template_category::Entity>(&txn, id, "Category").await?;

    let detached = template::Entity::update_many()
        .col_expr(template::Column::CategoryId, Expr::value(Option::<i32>::None))
        .filter(template::Column::CategoryId.eq(id))
        .exec(&txn)
        .await?;
    template_category::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    tracing::info!(
        category_id = id,
        templates = detached.rows_affected,
        "Category deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/keywords",
    tag = "Site",
    operation_id = "listKeywords",
    summary = "Template keywords",
    responses((status = 200, description = "Keywords ordered by name", body = Vec<KeywordResponse>)),
)]
#[instrument(skip(state))]
pub async fn list_keywords(
    State(state): State<AppState>,
) -> Result<Json<Vec<KeywordResponse>>, AppError> {
    Ok(Json(load_keywords(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Keywords",
    operation_id = "adminListKeywords",
    summary = "List keywords",
    responses(
        (status = 200, description = "Keywords ordered by name", body = Vec<KeywordResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn admin_list_keywords(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<KeywordResponse>>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    Ok(Json(load_keywords(&state.db).await?))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Keywords",
    operation_id = "createKeyword",
    summary = "Create a keyword",
    request_body = KeywordRequest,
    responses(
        (status = 201, description = "Keyword created", body = KeywordResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 409, description = "Keyword exists (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_keyword(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<KeywordRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_keyword(&payload)?;

    let model = keyword::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| AppError::from_write(e, KEYWORD_TAKEN))?;

    Ok((StatusCode::CREATED, Json(KeywordResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Keywords",
    operation_id = "getKeyword",
    summary = "Get a keyword",
    params(("id" = i32, Path, description = "Keyword ID")),
    responses(
        (status = 200, description = "Keyword", body = KeywordResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Keyword not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_keyword(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<KeywordResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    let model = find_row::<keyword::Entity, _>(&state.db, id, "Keyword").await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Keywords",
    operation_id = "renameKeyword",
    summary = "Rename a keyword",
    params(("id" = i32, Path, description = "Keyword ID")),
    request_body = KeywordRequest,
    responses(
        (status = 200, description = "Keyword renamed", body = KeywordResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Keyword not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Keyword exists (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_keyword(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<KeywordRequest>,
) -> Result<Json<KeywordResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_keyword(&payload)?;

    let existing = find_row::<keyword::Entity, _>(&state.db, id, "Keyword").await?;
    let mut active: keyword::ActiveModel = existing.into();
    active.name = Set(payload.name.trim().to_string());
    let model = active
        .update(&state.db)
        .await
        .map_err(|e| AppError::from_write(e, KEYWORD_TAKEN))?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Keywords",
    operation_id = "deleteKeyword",
    summary = "Delete a keyword",
    description = "Also removes the keyword from every template.",
    params(("id" = i32, Path, description = "Keyword ID")),
    responses(
        (status = 204, description = "Keyword deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Keyword not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_keyword(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;

    let txn = state.db.begin().await?;
    find_row_for_update::<keyword::Entity>(&txn, id, "Keyword").await?;

    template_keyword::Entity::delete_many()
        .filter(template_keyword::Column::KeywordId.eq(id))
        .exec(&txn)
        .await?;
    keyword::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
