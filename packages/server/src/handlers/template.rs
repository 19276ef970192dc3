use std::collections::{HashMap, HashSet};

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, Query as SeaQuery};
use sea_orm::*;
use tracing::instrument;

use super::rows::{find_row, find_row_for_update, next_order_index, reorder_rows};
use crate::entity::{keyword, template, template_category, template_keyword};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, CONTENT_MANAGE};
use crate::extractors::json::{AppJson, AppQuery};
use crate::models::shared::{
    ReorderRequest, normalize_optional_image_link, normalize_optional_text, validate_reorder_ids,
};
use crate::models::taxonomy::{CategorySummary, KeywordResponse};
use crate::models::template::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/templates",
    tag = "Site",
    operation_id = "listTemplates",
    summary = "Portfolio templates",
    description = "Templates in display order with their category and keywords embedded. Filters combine with AND.",
    params(TemplateListQuery),
    responses(
        (status = 200, description = "Templates", body = Vec<TemplateResponse>),
        (status = 400, description = "Malformed query (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(featured = ?query.featured, category_id = ?query.category_id))]
pub async fn list_templates(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<TemplateListQuery>,
) -> Result<Json<Vec<TemplateResponse>>, AppError> {
    Ok(Json(load_templates(&state.db, &query).await?))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Templates",
    operation_id = "adminListTemplates",
    summary = "List templates",
    params(TemplateListQuery),
    responses(
        (status = 200, description = "Templates", body = Vec<TemplateResponse>),
        (status = 400, description = "Malformed query (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn admin_list_templates(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<TemplateListQuery>,
) -> Result<Json<Vec<TemplateResponse>>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    Ok(Json(load_templates(&state.db, &query).await?))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Templates",
    operation_id = "createTemplate",
    summary = "Create a template",
    description = "Creates the template and attaches `keyword_ids` in one transaction.",
    request_body = CreateTemplateRequest,
    responses(
        (status = 201, description = "Template created", body = TemplateResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Category or keyword not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(title = %payload.title, keywords = payload.keyword_ids.len()))]
pub async fn create_template(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateTemplateRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_create_template(&payload)?;

    let txn = state.db.begin().await?;

    if let Some(category_id) = payload.category_id {
        ensure_category_exists(&txn, category_id).await?;
    }

    let order_index = match payload.order_index {
        Some(idx) => idx,
        None => next_order_index::<template::Entity, _>(&txn, template::Column::OrderIndex).await?,
    };

    let now = chrono::Utc::now();
    let model = template::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        description: Set(payload.description.trim().to_string()),
        image_url: Set(normalize_optional_image_link(payload.image_url)),
        category_id: Set(payload.category_id),
        price: Set(payload.price),
        is_featured: Set(payload.is_featured),
        purchase_url: Set(normalize_optional_text(payload.purchase_url)),
        order_index: Set(order_index),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    replace_keywords(&txn, model.id, &payload.keyword_ids).await?;
    txn.commit().await?;

    let response = single_response(&state.db, model).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Templates",
    operation_id = "getTemplate",
    summary = "Get a template",
    params(("id" = i32, Path, description = "Template ID")),
    responses(
        (status = 200, description = "Template", body = TemplateResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Template not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_template(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TemplateResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    let model = find_row::<template::Entity, _>(&state.db, id, "Template").await?;
    Ok(Json(single_response(&state.db, model).await?))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Templates",
    operation_id = "updateTemplate",
    summary = "Update a template",
    description = "PATCH semantics. When `keyword_ids` is present the keyword set is replaced exactly, in the same transaction as the field updates.",
    params(("id" = i32, Path, description = "Template ID")),
    request_body = UpdateTemplateRequest,
    responses(
        (status = 200, description = "Template updated", body = TemplateResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Template, category or keyword not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_template(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateTemplateRequest>,
) -> Result<Json<TemplateResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_update_template(&payload)?;

    if payload == UpdateTemplateRequest::default() {
        let existing = find_row::<template::Entity, _>(&state.db, id, "Template").await?;
        return Ok(Json(single_response(&state.db, existing).await?));
    }

    let txn = state.db.begin().await?;
    let existing = find_row_for_update::<template::Entity>(&txn, id, "Template").await?;

    if let Some(Some(category_id)) = payload.category_id {
        ensure_category_exists(&txn, category_id).await?;
    }

    let mut active: template::ActiveModel = existing.into();

    if let Some(ref title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(ref description) = payload.description {
        active.description = Set(description.trim().to_string());
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(normalize_optional_image_link(image_url));
    }
    if let Some(category_id) = payload.category_id {
        active.category_id = Set(category_id);
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(is_featured) = payload.is_featured {
        active.is_featured = Set(is_featured);
    }
    if let Some(purchase_url) = payload.purchase_url {
        active.purchase_url = Set(normalize_optional_text(purchase_url));
    }
    if let Some(order_index) = payload.order_index {
        active.order_index = Set(order_index);
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;

    if let Some(ref keyword_ids) = payload.keyword_ids {
        replace_keywords(&txn, id, keyword_ids).await?;
    }
    txn.commit().await?;

    Ok(Json(single_response(&state.db, model).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Templates",
    operation_id = "deleteTemplate",
    summary = "Delete a template",
    description = "Removes the template together with its keyword associations.",
    params(("id" = i32, Path, description = "Template ID")),
    responses(
        (status = 204, description = "Template deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Template not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_template(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;

    let txn = state.db.begin().await?;
    find_row_for_update::<template::Entity>(&txn, id, "Template").await?;

    template_keyword::Entity::delete_many()
        .filter(template_keyword::Column::TemplateId.eq(id))
        .exec(&txn)
        .await?;
    template::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/reorder",
    tag = "Templates",
    operation_id = "reorderTemplates",
    summary = "Reorder the portfolio",
    request_body = ReorderRequest,
    responses(
        (status = 204, description = "Templates reordered"),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn reorder_templates(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ReorderRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_reorder_ids(&payload.ids)?;
    reorder_rows::<template::Entity>(
        &state.db,
        &payload.ids,
        template::Column::Id,
        template::Column::OrderIndex,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn load_templates<C: ConnectionTrait>(
    db: &C,
    query: &TemplateListQuery,
) -> Result<Vec<TemplateResponse>, AppError> {
    let mut select = template::Entity::find();

    if query.featured == Some(true) {
        select = select.filter(template::Column::IsFeatured.eq(true));
    }
    if let Some(category_id) = query.category_id {
        select = select.filter(template::Column::CategoryId.eq(category_id));
    }
    if let Some(ref term) = query.keyword {
        let term = term.trim().to_lowercase();
        if !term.is_empty() {
            let keyword_ids: Vec<i32> = keyword::Entity::find()
                .filter(Expr::expr(Func::lower(Expr::col(keyword::Column::Name))).eq(term))
                .select_only()
                .column(keyword::Column::Id)
                .into_tuple::<i32>()
                .all(db)
                .await?;
            if keyword_ids.is_empty() {
                return Ok(Vec::new());
            }
            select = select.filter(
                template::Column::Id.in_subquery(
                    SeaQuery::select()
                        .column(template_keyword::Column::TemplateId)
                        .from(template_keyword::Entity)
                        .and_where(template_keyword::Column::KeywordId.is_in(keyword_ids))
                        .to_owned(),
                ),
            );
        }
    }

    let templates = select
        .order_by_asc(template::Column::OrderIndex)
        .order_by_asc(template::Column::CreatedAt)
        .all(db)
        .await?;

    with_relations(db, templates).await
}

/// Attach categories and keywords with one query per related table.
async fn with_relations<C: ConnectionTrait>(
    db: &C,
    templates: Vec<template::Model>,
) -> Result<Vec<TemplateResponse>, AppError> {
    if templates.is_empty() {
        return Ok(Vec::new());
    }

    let template_ids: Vec<i32> = templates.iter().map(|t| t.id).collect();
    let category_ids: HashSet<i32> = templates.iter().filter_map(|t| t.category_id).collect();

    let categories: HashMap<i32, template_category::Model> = if category_ids.is_empty() {
        HashMap::new()
    } else {
        template_category::Entity::find()
            .filter(template_category::Column::Id.is_in(category_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect()
    };

    let links = template_keyword::Entity::find()
        .filter(template_keyword::Column::TemplateId.is_in(template_ids))
        .all(db)
        .await?;
    let keyword_ids: HashSet<i32> = links.iter().map(|l| l.keyword_id).collect();
    let keywords: HashMap<i32, keyword::Model> = if keyword_ids.is_empty() {
        HashMap::new()
    } else {
        keyword::Entity::find()
            .filter(keyword::Column::Id.is_in(keyword_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|k| (k.id, k))
            .collect()
    };

    let mut by_template: HashMap<i32, Vec<KeywordResponse>> = HashMap::new();
    for link in links {
        if let Some(k) = keywords.get(&link.keyword_id) {
            by_template
                .entry(link.template_id)
                .or_default()
                .push(KeywordResponse {
                    id: k.id,
                    name: k.name.clone(),
                });
        }
    }
    for list in by_template.values_mut() {
        list.sort_by(|a, b| a.name.cmp(&b.name));
    }

    Ok(templates
        .into_iter()
        .map(|t| {
            let category = t
                .category_id
                .and_then(|id| categories.get(&id))
                .cloned()
                .map(CategorySummary::from);
            let keywords = by_template.remove(&t.id).unwrap_or_default();
            TemplateResponse::new(t, category, keywords)
        })
        .collect())
}

async fn single_response<C: ConnectionTrait>(
    db: &C,
    model: template::Model,
) -> Result<TemplateResponse, AppError> {
    with_relations(db, vec![model])
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal("template vanished while loading relations".into()))
}

async fn ensure_category_exists<C: ConnectionTrait>(db: &C, id: i32) -> Result<(), AppError> {
    find_row::<template_category::Entity, _>(db, id, "Category").await?;
    Ok(())
}

/// Make `keyword_ids` the exact keyword set of the template.
async fn replace_keywords(
    txn: &DatabaseTransaction,
    template_id: i32,
    keyword_ids: &[i32],
) -> Result<(), AppError> {
    if !keyword_ids.is_empty() {
        let found: HashSet<i32> = keyword::Entity::find()
            .filter(keyword::Column::Id.is_in(keyword_ids.iter().copied()))
            .select_only()
            .column(keyword::Column::Id)
            .into_tuple::<i32>()
            .all(txn)
            .await?
            .into_iter()
            .collect();
        if let Some(missing) = keyword_ids.iter().find(|id| !found.contains(id)) {
            return Err(AppError::NotFound(format!("Keyword {missing} not found")));
        }
    }

    template_keyword::Entity::delete_many()
        .filter(template_keyword::Column::TemplateId.eq(template_id))
        .exec(txn)
        .await?;

    for &keyword_id in keyword_ids {
        template_keyword::ActiveModel {
            template_id: Set(template_id),
            keyword_id: Set(keyword_id),
        }
        .insert(txn)
        .await?;
    }
    Ok(())
}
