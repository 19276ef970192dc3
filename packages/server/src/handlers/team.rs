use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use super::rows::{delete_row, find_row, find_row_for_update, next_order_index, reorder_rows};
use crate::entity::team_member;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, CONTENT_MANAGE};
use crate::extractors::json::AppJson;
use crate::models::shared::{
    ReorderRequest, normalize_optional_image_link, validate_reorder_ids,
};
use crate::models::team::*;
use crate::state::AppState;

async fn load_team<C: ConnectionTrait>(db: &C) -> Result<Vec<TeamMemberResponse>, AppError> {
    let rows = team_member::Entity::find()
        .order_by_asc(team_member::Column::OrderIndex)
        .order_by_asc(team_member::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(TeamMemberResponse::from).collect())
}

#[utoipa::path(
    get,
    path = "/team",
    tag = "Site",
    operation_id = "listTeamMembers",
    summary = "Team members for the about page",
    responses((status = 200, description = "Team members in display order", body = Vec<TeamMemberResponse>)),
)]
#[instrument(skip(state))]
pub async fn list_team_members(
    State(state): State<AppState>,
) -> Result<Json<Vec<TeamMemberResponse>>, AppError> {
    Ok(Json(load_team(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Team",
    operation_id = "adminListTeamMembers",
    summary = "List team members",
    responses(
        (status = 200, description = "Team members", body = Vec<TeamMemberResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn admin_list_team_members(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<TeamMemberResponse>>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    Ok(Json(load_team(&state.db).await?))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Team",
    operation_id = "createTeamMember",
    summary = "Add a team member",
    request_body = CreateTeamMemberRequest,
    responses(
        (status = 201, description = "Team member created", body = TeamMemberResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_team_member(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateTeamMemberRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_create_team_member(&payload)?;

    let order_index = match payload.order_index {
        Some(idx) => idx,
        None => {
            next_order_index::<team_member::Entity, _>(&state.db, team_member::Column::OrderIndex)
                .await?
        }
    };

    let now = chrono::Utc::now();
    let model = team_member::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        role: Set(payload.role.trim().to_string()),
        description: Set(payload.description.trim().to_string()),
        image_url: Set(normalize_optional_image_link(payload.image_url)),
        order_index: Set(order_index),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(TeamMemberResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Team",
    operation_id = "getTeamMember",
    summary = "Get a team member",
    params(("id" = i32, Path, description = "Team member ID")),
    responses(
        (status = 200, description = "Team member", body = TeamMemberResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Team member not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_team_member(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TeamMemberResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    let model = find_row::<team_member::Entity, _>(&state.db, id, "Team member").await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Team",
    operation_id = "updateTeamMember",
    summary = "Update a team member",
    description = "PATCH semantics; `image_url: null` removes the photo.",
    params(("id" = i32, Path, description = "Team member ID")),
    request_body = UpdateTeamMemberRequest,
    responses(
        (status = 200, description = "Team member updated", body = TeamMemberResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Team member not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_team_member(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateTeamMemberRequest>,
) -> Result<Json<TeamMemberResponse>, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_update_team_member(&payload)?;

    if payload == UpdateTeamMemberRequest::default() {
        let existing = find_row::<team_member::Entity, _>(&state.db, id, "Team member").await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;
    let existing = find_row_for_update::<team_member::Entity>(&txn, id, "Team member").await?;
    let mut active: team_member::ActiveModel = existing.into();

    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(ref role) = payload.role {
        active.role = Set(role.trim().to_string());
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
    tag = "Team",
    operation_id = "deleteTeamMember",
    summary = "Remove a team member",
    params(("id" = i32, Path, description = "Team member ID")),
    responses(
        (status = 204, description = "Team member deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Team member not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_team_member(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    delete_row::<team_member::Entity>(&state.db, id, "Team member").await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/reorder",
    tag = "Team",
    operation_id = "reorderTeamMembers",
    summary = "Reorder team members",
    request_body = ReorderRequest,
    responses(
        (status = 204, description = "Team reordered"),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn reorder_team_members(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ReorderRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(CONTENT_MANAGE)?;
    validate_reorder_ids(&payload.ids)?;
    reorder_rows::<team_member::Entity>(
        &state.db,
        &payload.ids,
        team_member::Column::Id,
        team_member::Column::OrderIndex,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
