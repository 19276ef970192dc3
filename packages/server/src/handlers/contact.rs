use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use super::rows::delete_row;
use crate::config::MailConfig;
use crate::entity::contact_message;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, MESSAGE_READ};
use crate::extractors::json::{AppJson, AppQuery};
use crate::mail::{Mailer, contact_notification};
use crate::models::contact::*;
use crate::models::shared::{PageQuery, Pagination, normalize_optional_text};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Contact",
    operation_id = "submitContact",
    summary = "Send a contact-form message",
    description = "Stores the message and forwards it by email. A mail failure is logged and \
        reported as `delivered: false`; the message is kept and the request still succeeds.",
    request_body = ContactRequest,
    responses(
        (status = 202, description = "Message accepted", body = ContactSubmitted),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn submit_contact(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ContactRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_contact(&payload)?;

    let stored = contact_message::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        email: Set(payload.email.trim().to_string()),
        company: Set(normalize_optional_text(payload.company)),
        message: Set(payload.message.trim().to_string()),
        delivered: Set(false),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    let delivered =
        forward_message(&state.db, state.mailer.as_ref(), &state.config.mail, &stored).await;

    tracing::info!(message_id = stored.id, delivered, "Contact message received");

    Ok((
        StatusCode::ACCEPTED,
        Json(ContactSubmitted {
            id: stored.id,
            delivered,
        }),
    ))
}

/// Email a stored message and flag it as delivered. Returns whether the mail
/// API accepted it; a failed flag update is only logged.
async fn forward_message<C: ConnectionTrait>(
    db: &C,
    mailer: &dyn Mailer,
    mail: &MailConfig,
    stored: &contact_message::Model,
) -> bool {
    let email = contact_notification(mail, stored);
    if let Err(e) = mailer.send(&email).await {
        tracing::warn!(message_id = stored.id, error = %e, "Contact email not delivered");
        return false;
    }

    let flagged = contact_message::Entity::update_many()
        .col_expr(
            contact_message::Column::Delivered,
            sea_orm::prelude::Expr::value(true),
        )
        .filter(contact_message::Column::Id.eq(stored.id))
        .exec(db)
        .await;
    if let Err(e) = flagged {
        tracing::warn!(
            message_id = stored.id,
            error = %e,
            "Contact email sent but delivered flag not saved"
        );
    }
    true
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Messages",
    operation_id = "listMessages",
    summary = "List contact messages",
    description = "Newest first.",
    params(PageQuery),
    responses(
        (status = 200, description = "Messages", body = MessageListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_messages(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PageQuery>,
) -> Result<Json<MessageListResponse>, AppError> {
    auth_user.require_permission(MESSAGE_READ)?;
    let (page, per_page) = query.resolve();

    let select = contact_message::Entity::find();
    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;

    let rows = select
        .order_by_desc(contact_message::Column::CreatedAt)
        .order_by_desc(contact_message::Column::Id)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(&state.db)
        .await?;

    Ok(Json(MessageListResponse {
        data: rows.into_iter().map(MessageResponse::from).collect(),
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages: total.div_ceil(per_page),
        },
    }))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Messages",
    operation_id = "deleteMessage",
    summary = "Delete a contact message",
    params(("id" = i32, Path, description = "Message ID")),
    responses(
        (status = 204, description = "Message deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Message not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_message(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(MESSAGE_READ)?;
    delete_row::<contact_message::Entity>(&state.db, id, "Message").await?;
    Ok(StatusCode::NO_CONTENT)
}
