use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{
    DESCRIPTION_MAX, TITLE_MAX, double_option, validate_max_len, validate_optional_link,
    validate_optional_order_index, validate_text, validate_title,
};
use crate::entity::testimonial;
use crate::error::AppError;

fn default_rating() -> i32 {
    5
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateTestimonialRequest {
    #[schema(example = "Lucía Ramos")]
    pub name: String,
    /// Job title; may be blank.
    #[serde(default)]
    #[schema(example = "Gerente de Operaciones")]
    pub role: String,
    /// May be blank.
    #[serde(default)]
    pub company: String,
    pub content: String,
    pub image_url: Option<String>,
    /// Star rating 1-5. Default: 5.
    #[serde(default = "default_rating")]
    #[schema(example = 5, minimum = 1, maximum = 5)]
    pub rating: i32,
    pub order_index: Option<i32>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateTestimonialRequest {
    pub name: Option<String>,
    pub role: Option<String>,
    pub company: Option<String>,
    pub content: Option<String>,
    /// `null` removes the photo.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Option<String>>,
    pub rating: Option<i32>,
    pub order_index: Option<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TestimonialResponse {
    pub id: i32,
    pub name: String,
    pub role: String,
    pub company: String,
    pub content: String,
    pub image_url: Option<String>,
    pub rating: i32,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<testimonial::Model> for TestimonialResponse {
    fn from(m: testimonial::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            role: m.role,
            company: m.company,
            content: m.content,
            image_url: m.image_url,
            rating: m.rating,
            order_index: m.order_index,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

fn validate_rating(rating: i32) -> Result<(), AppError> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::Validation("Rating must be between 1 and 5".into()));
    }
    Ok(())
}

pub fn validate_create_testimonial(req: &CreateTestimonialRequest) -> Result<(), AppError> {
    validate_title("Name", &req.name)?;
    validate_max_len("Role", &req.role, TITLE_MAX)?;
    validate_max_len("Company", &req.company, TITLE_MAX)?;
    validate_text("Content", &req.content, DESCRIPTION_MAX)?;
    validate_optional_link("image_url", req.image_url.as_ref())?;
    validate_rating(req.rating)?;
    validate_optional_order_index(req.order_index)
}

pub fn validate_update_testimonial(req: &UpdateTestimonialRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_title("Name", name)?;
    }
    if let Some(ref role) = req.role {
        validate_max_len("Role", role, TITLE_MAX)?;
    }
    if let Some(ref company) = req.company {
        validate_max_len("Company", company, TITLE_MAX)?;
    }
    if let Some(ref content) = req.content {
        validate_text("Content", content, DESCRIPTION_MAX)?;
    }
    if let Some(ref image_url) = req.image_url {
        validate_optional_link("image_url", image_url.as_ref())?;
    }
    if let Some(rating) = req.rating {
        validate_rating(rating)?;
    }
    validate_optional_order_index(req.order_index)
}
