use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::Pagination;
use crate::entity::image_object;

/// A stored image with its public URL.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ImageResponse {
    /// Content-derived object key (`<sha256>.<ext>`).
    #[schema(example = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08.png")]
    pub key: String,
    /// Absolute URL to store in content fields.
    pub url: String,
    pub filename: String,
    #[schema(example = "image/png")]
    pub content_type: String,
    /// Size in bytes.
    pub size: i64,
    pub width: i32,
    pub height: i32,
    pub created_at: DateTime<Utc>,
}

impl ImageResponse {
    pub fn new(m: image_object::Model, public_base_url: &str) -> Self {
        Self {
            url: public_url(public_base_url, &m.key),
            key: m.key,
            filename: m.filename,
            content_type: m.content_type,
            size: m.size,
            width: m.width,
            height: m.height,
            created_at: m.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ImageListResponse {
    pub data: Vec<ImageResponse>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteByUrlQuery {
    /// URL previously returned by the upload endpoint. Only its last path
    /// segment is used.
    pub url: String,
}

/// `<base>/media/<key>`, tolerating a trailing slash on the base.
pub fn public_url(public_base_url: &str, key: &str) -> String {
    format!("{}/media/{key}", public_base_url.trim_end_matches('/'))
}
