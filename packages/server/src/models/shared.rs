use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;
use crate::utils::links::{is_acceptable_link, rewrite_drive_link};

/// Upper bound for titles, names and other single-line fields.
pub const TITLE_MAX: usize = 256;
/// Upper bound for descriptions and testimonial bodies.
pub const DESCRIPTION_MAX: usize = 2000;
/// Upper bound for the long-form about-us sections.
pub const LONG_TEXT_MAX: usize = 10_000;

/// Pagination metadata included in list responses.
#[derive(Serialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 20)]
    pub per_page: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 47)]
    pub total: u64,
    /// Total number of pages.
    #[schema(example = 3)]
    pub total_pages: u64,
}

/// Query string for paginated admin lists.
#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number (1-based). Default: 1.
    pub page: Option<u64>,
    /// Items per page (1-100). Default: 20.
    pub per_page: Option<u64>,
}

/// Highest page number honoured; keeps `(page - 1) * per_page` far from overflow.
const MAX_PAGE: u64 = 1_000_000;

impl PageQuery {
    /// Clamp to `(1 <= page <= MAX_PAGE, 1 <= per_page <= 100)`.
    pub fn resolve(&self) -> (u64, u64) {
        let page = self.page.unwrap_or(1).clamp(1, MAX_PAGE);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        (page, per_page)
    }
}

/// Request body for reorder endpoints.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct ReorderRequest {
    /// Ordered list of row IDs. `order_index` is assigned 0, 1, 2… by array
    /// index. Must contain exactly the rows currently in the table.
    #[schema(example = json!([3, 1, 2]))]
    pub ids: Vec<i32>,
}

/// Serde helper for PATCH semantics on nullable fields.
///
/// * JSON field absent  => `None`          (don't update)
/// * JSON field = null  => `Some(None)`    (set to NULL)
/// * JSON field = value => `Some(Some(v))` (set to value)
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// Validate a required text field: trimmed, 1..=`max` Unicode characters.
pub fn validate_text(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{field} must be 1-{max} characters"
        )));
    }
    Ok(())
}

/// Validate a text field that may be left blank (at most `max` characters).
pub fn validate_max_len(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.trim().chars().count() > max {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Validate an icon name (1-64 characters).
pub fn validate_icon(value: &str) -> Result<(), AppError> {
    validate_text("Icon", value, 64)
}

/// Validate a title-like field (1-256 Unicode characters).
pub fn validate_title(field: &str, value: &str) -> Result<(), AppError> {
    validate_text(field, value, TITLE_MAX)
}

/// Validate a stored link (http(s) URL or `/media/...` path, at most 2048 bytes).
pub fn validate_link(field: &str, value: &str) -> Result<(), AppError> {
    let value = value.trim();
    if value.len() > 2048 || !is_acceptable_link(value) {
        return Err(AppError::Validation(format!(
            "{field} must be an http(s) URL or a /media/ path"
        )));
    }
    Ok(())
}

/// Validate an optional link; an empty string is treated as absent.
pub fn validate_optional_link(field: &str, value: Option<&String>) -> Result<(), AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => validate_link(field, v),
        _ => Ok(()),
    }
}

/// Normalize an image link for storage: trim and rewrite Drive share links.
pub fn normalize_image_link(value: &str) -> String {
    rewrite_drive_link(value.trim())
}

/// Normalize an optional image link; blank strings become `None`.
pub fn normalize_optional_image_link(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(|v| rewrite_drive_link(&v))
}

/// Normalize an optional text field; blank strings become `None`.
pub fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validate an optional `order_index` (must be >= 0 when present).
pub fn validate_optional_order_index(order_index: Option<i32>) -> Result<(), AppError> {
    if let Some(idx) = order_index
        && idx < 0
    {
        return Err(AppError::Validation("order_index must be >= 0".into()));
    }
    Ok(())
}

/// Validate an ordered ID list for reorder operations (non-empty, no duplicates).
pub fn validate_reorder_ids(ids: &[i32]) -> Result<(), AppError> {
    if ids.is_empty() {
        return Err(AppError::Validation("ids must not be empty".into()));
    }
    validate_unique_ids(ids, "id")
}

/// Reject duplicate IDs in a list.
pub fn validate_unique_ids(ids: &[i32], name: &str) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for &id in ids {
        if !seen.insert(id) {
            return Err(AppError::Validation(format!("Duplicate {name} {id}")));
        }
    }
    Ok(())
}
