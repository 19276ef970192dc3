use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{
    DESCRIPTION_MAX, double_option, validate_optional_link, validate_optional_order_index,
    validate_text, validate_title, validate_unique_ids,
};
use super::taxonomy::{CategorySummary, KeywordResponse};
use crate::entity::template;
use crate::error::AppError;

/// Upper bound on the price, in soles.
const PRICE_MAX: f64 = 1_000_000.0;
/// Upper bound on keywords attached to a single template.
const KEYWORDS_MAX: usize = 50;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateTemplateRequest {
    #[schema(example = "Dashboard de ventas en Power BI")]
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub category_id: Option<i32>,
    /// Price in soles. Omit or `null` for "ask for a quote".
    #[schema(example = 149.9)]
    pub price: Option<f64>,
    /// Default: false.
    #[serde(default)]
    pub is_featured: bool,
    pub purchase_url: Option<String>,
    /// Keywords to attach. Default: none.
    #[serde(default)]
    #[schema(example = json!([1, 4]))]
    pub keyword_ids: Vec<i32>,
    pub order_index: Option<i32>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateTemplateRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Option<String>>,
    /// `null` leaves the template uncategorized.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub category_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub price: Option<Option<f64>>,
    pub is_featured: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub purchase_url: Option<Option<String>>,
    /// When present, replaces the whole keyword set.
    pub keyword_ids: Option<Vec<i32>>,
    pub order_index: Option<i32>,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TemplateListQuery {
    /// Only featured templates (home-page portfolio preview).
    pub featured: Option<bool>,
    /// Only templates in this category.
    pub category_id: Option<i32>,
    /// Only templates tagged with this keyword (case-insensitive).
    pub keyword: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TemplateResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub category_id: Option<i32>,
    pub category: Option<CategorySummary>,
    pub price: Option<f64>,
    pub is_featured: bool,
    pub purchase_url: Option<String>,
    /// Attached keywords ordered by name.
    pub keywords: Vec<KeywordResponse>,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TemplateResponse {
    pub fn new(
        m: template::Model,
        category: Option<CategorySummary>,
        keywords: Vec<KeywordResponse>,
    ) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            image_url: m.image_url,
            category_id: m.category_id,
            category,
            price: m.price,
            is_featured: m.is_featured,
            purchase_url: m.purchase_url,
            keywords,
            order_index: m.order_index,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

fn validate_price(price: f64) -> Result<(), AppError> {
    if !price.is_finite() || !(0.0..=PRICE_MAX).contains(&price) {
        return Err(AppError::Validation(format!(
            "Price must be between 0 and {PRICE_MAX}"
        )));
    }
    Ok(())
}

fn validate_keyword_ids(ids: &[i32]) -> Result<(), AppError> {
    if ids.len() > KEYWORDS_MAX {
        return Err(AppError::Validation(format!(
            "Too many keywords: max {KEYWORDS_MAX}"
        )));
    }
    validate_unique_ids(ids, "keyword_id")
}

pub fn validate_create_template(req: &CreateTemplateRequest) -> Result<(), AppError> {
    validate_title("Title", &req.title)?;
    validate_text("Description", &req.description, DESCRIPTION_MAX)?;
    validate_optional_link("image_url", req.image_url.as_ref())?;
    validate_optional_link("purchase_url", req.purchase_url.as_ref())?;
    if let Some(price) = req.price {
        validate_price(price)?;
    }
    validate_keyword_ids(&req.keyword_ids)?;
    validate_optional_order_index(req.order_index)
}

pub fn validate_update_template(req: &UpdateTemplateRequest) -> Result<(), AppError> {
    if let Some(ref title) = req.title {
        validate_title("Title", title)?;
    }
    if let Some(ref description) = req.description {
        validate_text("Description", description, DESCRIPTION_MAX)?;
    }
    if let Some(ref image_url) = req.image_url {
        validate_optional_link("image_url", image_url.as_ref())?;
    }
    if let Some(ref purchase_url) = req.purchase_url {
        validate_optional_link("purchase_url", purchase_url.as_ref())?;
    }
    if let Some(Some(price)) = req.price {
        validate_price(price)?;
    }
    if let Some(ref keyword_ids) = req.keyword_ids {
        validate_keyword_ids(keyword_ids)?;
    }
    validate_optional_order_index(req.order_index)
}
