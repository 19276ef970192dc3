use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{
    DESCRIPTION_MAX, validate_icon, validate_optional_order_index, validate_text, validate_title,
};
use crate::entity::corporate_value;
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateValueRequest {
    #[schema(example = "Transparencia")]
    pub title: String,
    pub description: String,
    #[schema(example = "Eye")]
    pub icon: String,
    pub order_index: Option<i32>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateValueRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub order_index: Option<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ValueResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<corporate_value::Model> for ValueResponse {
    fn from(m: corporate_value::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            icon: m.icon,
            order_index: m.order_index,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

pub fn validate_create_value(req: &CreateValueRequest) -> Result<(), AppError> {
    validate_title("Title", &req.title)?;
    validate_text("Description", &req.description, DESCRIPTION_MAX)?;
    validate_icon(&req.icon)?;
    validate_optional_order_index(req.order_index)
}

pub fn validate_update_value(req: &UpdateValueRequest) -> Result<(), AppError> {
    if let Some(ref title) = req.title {
        validate_title("Title", title)?;
    }
    if let Some(ref description) = req.description {
        validate_text("Description", description, DESCRIPTION_MAX)?;
    }
    if let Some(ref icon) = req.icon {
        validate_icon(icon)?;
    }
    validate_optional_order_index(req.order_index)
}
