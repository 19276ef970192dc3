use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::instrument;

use super::rows::{
    SINGLETON_ID, delete_row, find_row, find_row_for_update, next_order_index, reorder_rows,
};
use crate::entity::{bi_faq, bi_feature, bi_hero, bi_video};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, CONTENT_MANAGE};
use crate::extractors::json::AppJson;
use crate::models::bi::*;
use crate::models::shared::{ReorderRequest, normalize_image_link, validate_reorder_ids};
use crate::state::AppState;

async fn load_features<C: ConnectionTrait>(db: &C) -> Result<Vec<BiFeatureResponse>, AppError> {
    let rows = bi_feature::Entity::find()
        .order_by_asc(bi_feature::Column::OrderIndex)
        .order_by_asc(bi_feature::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(BiFeatureResponse::from).collect())
}

async fn load_faqs<C: ConnectionTrait>(db: &C) -> Result<Vec<BiFaqResponse>, AppError> {
    let rows = bi_faq::Entity::find()
        .order_by_asc(bi_faq::Column::OrderIndex)
        .order_by_asc(bi_faq::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(BiFaqResponse::from).collect())
}

#[utoipa::path(
    get,
    path = "/bi",
    tag = "Site",
    operation_id = "getBiPage",
    summary = "Business-intelligence page",
    description = "Hero banner, feature cards, video and FAQ in one response. \
        `hero` and `video` are null until they have been saved once.",
    responses((status = 200, description = "BI page content", body = BiPageResponse)),
)]
#[instrument(skip(state))]
pub async fn get_bi_page(State(state): State<AppState>) -> Result<Json<BiPageResponse>, AppError> {
    let hero = bi_hero::Entity::find_by_id(SINGLETON_ID)
        .one(&state.db)
        .await?
        .map(BiHeroResponse::from);
    let video = bi_video::Entity::find_by_id(SINGLETON_ID)
        .one(&state.db)
        .await?
        .map(BiVideoResponse::from);

    Ok(Json(BiPageResponse {
        hero,
        features: load_features(&state.db).await?,
        video,
        faqs: load_faqs(&state.db).await?,
    }))
}

// Singletons

#[utoipa::path(
    get,
    path = "/hero",
    tag = "BI",
    operation_id = "getBiHero",
    summary = "Get the BI hero banner",
    responses(
        (status = 200, description = "Hero banner", body = BiHeroResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not saved yet (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn get_bi_hero(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<BiHeroResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    let model = find_row::<bi_hero::Entity, _>(&state.db, SINGLETON_ID, "BI hero").await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/hero",
    tag = "BI",
    operation_id = "upsertBiHero",
    summary = "Save the BI hero banner",
    request_body = BiHeroRequest,
    responses(
        (status = 200, description = "Saved", body = BiHeroResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn upsert_bi_hero(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<BiHeroRequest>,
) -> Result<Json<BiHeroResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_bi_hero(&payload)?;

    let model = bi_hero::ActiveModel {
        id: Set(SINGLETON_ID),
        title: Set(payload.title.trim().to_string()),
        description: Set(payload.description.trim().to_string()),
        image_url: Set(normalize_image_link(&payload.image_url)),
        updated_at: Set(chrono::Utc::now()),
    };
    bi_hero::Entity::insert(model)
        .on_conflict(
            OnConflict::column(bi_hero::Column::Id)
                .update_columns([
                    bi_hero::Column::Title,
                    bi_hero::Column::Description,
                    bi_hero::Column::ImageUrl,
                    bi_hero::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(&state.db)
        .await?;

    let saved = find_row::<bi_hero::Entity, _>(&state.db, SINGLETON_ID, "BI hero").await?;
    Ok(Json(saved.into()))
}

#[utoipa::path(
    get,
    path = "/video",
    tag = "BI",
    operation_id = "getBiVideo",
    summary = "Get the BI video",
    responses(
        (status = 200, description = "Video", body = BiVideoResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not saved yet (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn get_bi_video(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<BiVideoResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    let model = find_row::<bi_video::Entity, _>(&state.db, SINGLETON_ID, "BI video").await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/video",
    tag = "BI",
    operation_id = "upsertBiVideo",
    summary = "Save the BI video",
    request_body = BiVideoRequest,
    responses(
        (status = 200, description = "Saved", body = BiVideoResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn upsert_bi_video(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<BiVideoRequest>,
) -> Result<Json<BiVideoResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_bi_video(&payload)?;

    let model = bi_video::ActiveModel {
        id: Set(SINGLETON_ID),
        video_url: Set(payload.video_url.trim().to_string()),
        title: Set(payload.title.trim().to_string()),
        description: Set(payload.description.trim().to_string()),
        updated_at: Set(chrono::Utc::now()),
    };
    bi_video::Entity::insert(model)
        .on_conflict(
            OnConflict::column(bi_video::Column::Id)
                .update_columns([
                    bi_video::Column::VideoUrl,
                    bi_video::Column::Title,
                    bi_video::Column::Description,
                    bi_video::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(&state.db)
        .await?;

    let saved = find_row::<bi_video::Entity, _>(&state.db, SINGLETON_ID, "BI video").await?;
    Ok(Json(saved.into()))
}

// Feature cards

#[utoipa::path(
    get,
    path = "/features",
    tag = "BI",
    operation_id = "listBiFeatures",
    summary = "List BI feature cards",
    responses(
        (status = 200, description = "Feature cards", body = Vec<BiFeatureResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_bi_features(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<BiFeatureResponse>>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    Ok(Json(load_features(&state.db).await?))
}

#[utoipa::path(
    post,
    path = "/features",
    tag = "BI",
    operation_id = "createBiFeature",
    summary = "Create a BI feature card",
    request_body = CreateBiFeatureRequest,
    responses(
        (status = 201, description = "Feature card created", body = BiFeatureResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(category = %payload.category))]
pub async fn create_bi_feature(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateBiFeatureRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_create_bi_feature(&payload)?;

    let order_index = match payload.order_index {
        Some(idx) => idx,
        None => {
            next_order_index::<bi_feature::Entity, _>(&state.db, bi_feature::Column::OrderIndex)
                .await?
        }
    };

    let now = chrono::Utc::now();
    let model = bi_feature::ActiveModel {
        category: Set(payload.category.trim().to_string()),
        title: Set(payload.title.trim().to_string()),
        description: Set(payload.description.trim().to_string()),
        image_url: Set(normalize_image_link(&payload.image_url)),
        order_index: Set(order_index),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(BiFeatureResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/features/{id}",
    tag = "BI",
    operation_id = "getBiFeature",
    summary = "Get a BI feature card",
    params(("id" = i32, Path, description = "Feature card ID")),
    responses(
        (status = 200, description = "Feature card", body = BiFeatureResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Feature card not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_bi_feature(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<BiFeatureResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    let model = find_row::<bi_feature::Entity, _>(&state.db, id, "Feature").await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/features/{id}",
    tag = "BI",
    operation_id = "updateBiFeature",
    summary = "Update a BI feature card",
    params(("id" = i32, Path, description = "Feature card ID")),
    request_body = UpdateBiFeatureRequest,
    responses(
        (status = 200, description = "Feature card updated", body = BiFeatureResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Feature card not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_bi_feature(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateBiFeatureRequest>,
) -> Result<Json<BiFeatureResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_update_bi_feature(&payload)?;

    if payload == UpdateBiFeatureRequest::default() {
        let existing = find_row::<bi_feature::Entity, _>(&state.db, id, "Feature").await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;
    let existing = find_row_for_update::<bi_feature::Entity>(&txn, id, "Feature").await?;
    let mut active: bi_feature::ActiveModel = existing.into();

    if let Some(ref category) = payload.category {
        active.category = Set(category.trim().to_string());
    }
    if let Some(ref title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(ref description) = payload.description {
        active.description = Set(description.trim().to_string());
    }
    if let Some(ref image_url) = payload.image_url {
        active.image_url = Set(normalize_image_link(image_url));
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
    path = "/features/{id}",
    tag = "BI",
    operation_id = "deleteBiFeature",
    summary = "Delete a BI feature card",
    params(("id" = i32, Path, description = "Feature card ID")),
    responses(
        (status = 204, description = "Feature card deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Feature card not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_bi_feature(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    delete_row::<bi_feature::Entity>(&state.db, id, "Feature").await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/features/reorder",
    tag = "BI",
    operation_id = "reorderBiFeatures",
    summary = "Reorder BI feature cards",
    request_body = ReorderRequest,
    responses(
        (status = 204, description = "Feature cards reordered"),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn reorder_bi_features(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ReorderRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_reorder_ids(&payload.ids)?;
    reorder_rows::<bi_feature::Entity>(
        &state.db,
        &payload.ids,
        bi_feature::Column::Id,
        bi_feature::Column::OrderIndex,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

// FAQ

#[utoipa::path(
    get,
    path = "/faqs",
    tag = "BI",
    operation_id = "listBiFaqs",
    summary = "List BI FAQ entries",
    responses(
        (status = 200, description = "FAQ entries", body = Vec<BiFaqResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_bi_faqs(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<BiFaqResponse>>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    Ok(Json(load_faqs(&state.db).await?))
}

#[utoipa::path(
    post,
    path = "/faqs",
    tag = "BI",
    operation_id = "createBiFaq",
    summary = "Create a BI FAQ entry",
    request_body = CreateBiFaqRequest,
    responses(
        (status = 201, description = "FAQ entry created", body = BiFaqResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn create_bi_faq(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateBiFaqRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_create_bi_faq(&payload)?;

    let order_index = match payload.order_index {
        Some(idx) => idx,
        None => next_order_index::<bi_faq::Entity, _>(&state.db, bi_faq::Column::OrderIndex).await?,
    };

    let now = chrono::Utc::now();
    let model = bi_faq::ActiveModel {
        question: Set(payload.question.trim().to_string()),
        answer: Set(payload.answer.trim().to_string()),
        order_index: Set(order_index),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(BiFaqResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/faqs/{id}",
    tag = "BI",
    operation_id = "getBiFaq",
    summary = "Get a BI FAQ entry",
    params(("id" = i32, Path, description = "FAQ entry ID")),
    responses(
        (status = 200, description = "FAQ entry", body = BiFaqResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "FAQ entry not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_bi_faq(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<BiFaqResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    let model = find_row::<bi_faq::Entity, _>(&state.db, id, "FAQ entry").await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/faqs/{id}",
    tag = "BI",
    operation_id = "updateBiFaq",
    summary = "Update a BI FAQ entry",
    params(("id" = i32, Path, description = "FAQ entry ID")),
    request_body = UpdateBiFaqRequest,
    responses(
        (status = 200, description = "FAQ entry updated", body = BiFaqResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "FAQ entry not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_bi_faq(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateBiFaqRequest>,
) -> Result<Json<BiFaqResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_update_bi_faq(&payload)?;

    if payload == UpdateBiFaqRequest::default() {
        let existing = find_row::<bi_faq::Entity, _>(&state.db, id, "FAQ entry").await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;
    let existing = find_row_for_update::<bi_faq::Entity>(&txn, id, "FAQ entry").await?;
    let mut active: bi_faq::ActiveModel = existing.into();

    if let Some(ref question) = payload.question {
        active.question = Set(question.trim().to_string());
    }
    if let Some(ref answer) = payload.answer {
        active.answer = Set(answer.trim().to_string());
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
    path = "/faqs/{id}",
    tag = "BI",
    operation_id = "deleteBiFaq",
    summary = "Delete a BI FAQ entry",
    params(("id" = i32, Path, description = "FAQ entry ID")),
    responses(
        (status = 204, description = "FAQ entry deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "FAQ entry not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_bi_faq(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    delete_row::<bi_faq::Entity>(&state.db, id, "FAQ entry").await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/faqs/reorder",
    tag = "BI",
    operation_id = "reorderBiFaqs",
    summary = "Reorder BI FAQ entries",
    request_body = ReorderRequest,
    responses(
        (status = 204, description = "FAQ entries reordered"),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn reorder_bi_faqs(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ReorderRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_reorder_ids(&payload.ids)?;
    reorder_rows::<bi_faq::Entity>(
        &state.db,
        &payload.ids,
        bi_faq::Column::Id,
        bi_faq::Column::OrderIndex,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
