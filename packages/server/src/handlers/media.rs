use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::storage::ObjectKey;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::entity::image_object;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, MEDIA_MANAGE};
use crate::extractors::json::AppQuery;
use crate::models::media::*;
use crate::models::shared::{PageQuery, Pagination};
use crate::state::AppState;
use crate::utils::filename::validate_flat_filename;
use crate::utils::image::{ImageError, ImageLimits, inspect};
use crate::utils::links::last_path_segment;

/// Room for multipart framing on top of the image itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn image_upload_body_limit(max_image_size: u64) -> DefaultBodyLimit {
    let max = usize::try_from(max_image_size).unwrap_or(usize::MAX);
    DefaultBodyLimit::max(max.saturating_add(MULTIPART_OVERHEAD))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Media",
    operation_id = "uploadImage",
    summary = "Upload an image",
    description = "Stores the `file` multipart field in the public bucket. PNG, JPEG, GIF and WebP \
        are accepted. Uploading the same bytes twice returns the same key.",
    request_body(content_type = "multipart/form-data", description = "Image upload"),
    responses(
        (status = 201, description = "Image stored", body = ImageResponse),
        (status = 400, description = "Missing field, undecodable image or oversize dimensions (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 413, description = "File too large (PAYLOAD_TOO_LARGE)", body = ErrorBody),
        (status = 415, description = "Not an accepted image format (UNSUPPORTED_MEDIA_TYPE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart))]
pub async fn upload_image(
    auth_user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(MEDIA_MANAGE)?;

    let limits = ImageLimits {
        max_bytes: state.config.storage.max_image_size,
        max_dimension: state.config.storage.max_image_dimension,
    };

    let mut upload: Option<(Vec<u8>, Option<String>)> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().map(|s| s.to_string());
        let declared = field
            .content_type()
            .map(|s| s.to_string())
            .or_else(|| {
                file_name
                    .as_deref()
                    .and_then(|n| mime_guess::from_path(n).first())
                    .map(|m| m.essence_str().to_string())
            });
        if let Some(ref declared) = declared
            && !declared.starts_with("image/")
            && declared != "application/octet-stream"
        {
            return Err(AppError::UnsupportedMediaType(format!(
                "Expected an image, got {declared}"
            )));
        }

        let mut data = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
        {
            if (data.len() + chunk.len()) as u64 > limits.max_bytes {
                return Err(ImageError::TooLarge {
                    size: (data.len() + chunk.len()) as u64,
                    limit: limits.max_bytes,
                }
                .into());
            }
            data.extend_from_slice(&chunk);
        }
        upload = Some((data, file_name));
    }

    let (data, file_name) =
        upload.ok_or_else(|| AppError::Validation("Missing 'file' field".into()))?;
    let info = inspect(&data, limits)?;

    let filename = match file_name {
        Some(name) => validate_flat_filename(&name)
            .map_err(|e| AppError::Validation(e.message().into()))?
            .to_string(),
        None => format!("image.{}", info.extension()),
    };

    let key = ObjectKey::for_content(&data, info.extension())?;
    let written = state.images.put(&key, &data).await?;

    let row = image_object::ActiveModel {
        key: Set(key.to_string()),
        filename: Set(filename),
        content_type: Set(info.content_type().to_string()),
        size: Set(i64::try_from(data.len()).unwrap_or(i64::MAX)),
        width: Set(i32::try_from(info.width).unwrap_or(i32::MAX)),
        height: Set(i32::try_from(info.height).unwrap_or(i32::MAX)),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    image_object::Entity::insert(row)
        .on_conflict(
            OnConflict::column(image_object::Column::Key)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&state.db)
        .await?;

    let saved = find_image(&state.db, &key).await?;

    tracing::info!(
        %key,
        size = data.len(),
        width = info.width,
        height = info.height,
        new = written,
        "Image uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(ImageResponse::new(saved, &state.config.site.public_base_url)),
    ))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Media",
    operation_id = "listImages",
    summary = "List uploaded images",
    description = "Newest first.",
    params(PageQuery),
    responses(
        (status = 200, description = "Images", body = ImageListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_images(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PageQuery>,
) -> Result<Json<ImageListResponse>, AppError> {
    auth_user.require_permission(MEDIA_MANAGE)?;
    let (page, per_page) = query.resolve();

    let select = image_object::Entity::find();
    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;

    let rows = select
        .order_by_desc(image_object::Column::CreatedAt)
        .order_by_desc(image_object::Column::Id)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(&state.db)
        .await?;

    let base = &state.config.site.public_base_url;
    Ok(Json(ImageListResponse {
        data: rows
            .into_iter()
            .map(|m| ImageResponse::new(m, base))
            .collect(),
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
    path = "/{key}",
    tag = "Media",
    operation_id = "deleteImage",
    summary = "Delete an image by key",
    description = "Content that still links to the image is left untouched and will show a broken image.",
    params(("key" = String, Path, description = "Object key")),
    responses(
        (status = 204, description = "Image deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Image not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(key = %key))]
pub async fn delete_image(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(MEDIA_MANAGE)?;
    remove_image(&state, &key).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/by-url",
    tag = "Media",
    operation_id = "deleteImageByUrl",
    summary = "Delete an image by its public URL",
    description = "The key is taken from the last path segment of `url`.",
    params(DeleteByUrlQuery),
    responses(
        (status = 204, description = "Image deleted"),
        (status = 400, description = "URL has no path segment (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Image not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn delete_image_by_url(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<DeleteByUrlQuery>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(MEDIA_MANAGE)?;
    let key = last_path_segment(query.url.trim())
        .ok_or_else(|| AppError::Validation("url has no path segment".into()))?;
    remove_image(&state, &key).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/media/{key}",
    tag = "Media",
    operation_id = "serveImage",
    summary = "Serve an image",
    description = "Public. Keys are content hashes, so responses are cacheable forever. \
        Supports `If-None-Match`.",
    params(("key" = String, Path, description = "Object key")),
    responses(
        (status = 200, description = "Image bytes", content_type = "image/*"),
        (status = 304, description = "Not Modified (ETag match)"),
        (status = 404, description = "Image not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, headers), fields(key = %key))]
pub async fn serve_image(
    State(state): State<AppState>,
    Path(key): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let key = ObjectKey::parse(&key).map_err(|_| AppError::NotFound("Image not found".into()))?;

    let image = find_image(&state.db, &key).await?;

    let etag_value = format!("\"{}\"", key.digest_hex());
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && let Ok(val) = if_none_match.to_str()
        && (val == etag_value || val == "*")
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let reader = state.images.get_stream(&key).await?;
    let body = Body::from_stream(ReaderStream::new(reader));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, image.content_type)
        .header(header::CONTENT_LENGTH, image.size.to_string())
        .header(header::ETAG, &etag_value)
        .header(header::CACHE_CONTROL, "public, max-age=31536000, immutable")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}

async fn find_image<C: ConnectionTrait>(
    db: &C,
    key: &ObjectKey,
) -> Result<image_object::Model, AppError> {
    image_object::Entity::find()
        .filter(image_object::Column::Key.eq(key.to_string()))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Image not found".into()))
}

/// Drop the metadata row, then the bytes.
async fn remove_image(state: &AppState, raw_key: &str) -> Result<(), AppError> {
    let key = ObjectKey::parse(raw_key).map_err(|_| AppError::NotFound("Image not found".into()))?;

    let result = image_object::Entity::delete_many()
        .filter(image_object::Column::Key.eq(key.to_string()))
        .exec(&state.db)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Image not found".into()));
    }

    if !state.images.delete(&key).await? {
        tracing::warn!(%key, "Image row existed but the object was already gone");
    }
    tracing::info!(%key, "Image deleted");
    Ok(())
}
