use axum::Json;
use axum::extract::State;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::instrument;

use super::rows::SINGLETON_ID;
use crate::entity::about_us;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, CONTENT_MANAGE};
use crate::extractors::json::AppJson;
use crate::models::about::*;
use crate::state::AppState;

async fn load_about_us<C: ConnectionTrait>(db: &C) -> Result<AboutUsResponse, AppError> {
    about_us::Entity::find_by_id(SINGLETON_ID)
        .one(db)
        .await?
        .map(AboutUsResponse::from)
        .ok_or_else(|| AppError::NotFound("About us has not been written yet".into()))
}

#[utoipa::path(
    get,
    path = "/about",
    tag = "Site",
    operation_id = "getAboutUs",
    summary = "About us",
    description = "Mission, vision and history. 404 until an editor has saved the section once.",
    responses(
        (status = 200, description = "About us", body = AboutUsResponse),
        (status = 404, description = "Not written yet (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_about_us(
    State(state): State<AppState>,
) -> Result<Json<AboutUsResponse>, AppError> {
    Ok(Json(load_about_us(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "About",
    operation_id = "adminGetAboutUs",
    summary = "Get the about-us section",
    responses(
        (status = 200, description = "About us", body = AboutUsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not written yet (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn admin_get_about_us(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<AboutUsResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    Ok(Json(load_about_us(&state.db).await?))
}

#[utoipa::path(
    put,
    path = "/",
    tag = "About",
    operation_id = "upsertAboutUs",
    summary = "Save the about-us section",
    description = "Creates the section on first save and replaces it afterwards.",
    request_body = AboutUsRequest,
    responses(
        (status = 200, description = "Saved", body = AboutUsResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn upsert_about_us(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<AboutUsRequest>,
) -> Result<Json<AboutUsResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_about_us(&payload)?;

    let model = about_us::ActiveModel {
        id: Set(SINGLETON_ID),
        mission: Set(payload.mission.trim().to_string()),
        vision: Set(payload.vision.trim().to_string()),
        history: Set(payload.history.trim().to_string()),
        updated_at: Set(chrono::Utc::now()),
    };
    about_us::Entity::insert(model)
        .on_conflict(
            OnConflict::column(about_us::Column::Id)
                .update_columns([
                    about_us::Column::Mission,
                    about_us::Column::Vision,
                    about_us::Column::History,
                    about_us::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(&state.db)
        .await?;

    tracing::info!(user = %auth_user.username, "About us saved");
    Ok(Json(load_about_us(&state.db).await?))
}
