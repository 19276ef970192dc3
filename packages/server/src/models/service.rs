use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{
    DESCRIPTION_MAX, double_option, validate_icon, validate_optional_link,
    validate_optional_order_index, validate_text, validate_title,
};
use crate::entity::service;
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateServiceRequest {
    #[schema(example = "Business Intelligence")]
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    /// Icon name understood by the front end.
    #[schema(example = "BarChart3")]
    pub icon: String,
    /// Also list the service in the home-page preview. Default: false.
    #[serde(default)]
    pub show_in_home: bool,
    pub order_index: Option<i32>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateServiceRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    /// `null` or `""` removes the image.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Option<String>>,
    pub icon: Option<String>,
    pub show_in_home: Option<bool>,
    pub order_index: Option<i32>,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ServiceListQuery {
    /// Only services flagged for the home page.
    pub home: Option<bool>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ServiceResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub icon: String,
    pub show_in_home: bool,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<service::Model> for ServiceResponse {
    fn from(m: service::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            image_url: m.image_url,
            icon: m.icon,
            show_in_home: m.show_in_home,
            order_index: m.order_index,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

pub fn validate_create_service(req: &CreateServiceRequest) -> Result<(), AppError> {
    validate_title("Title", &req.title)?;
    validate_text("Description", &req.description, DESCRIPTION_MAX)?;
    validate_optional_link("image_url", req.image_url.as_ref())?;
    validate_icon(&req.icon)?;
    validate_optional_order_index(req.order_index)
}

pub fn validate_update_service(req: &UpdateServiceRequest) -> Result<(), AppError> {
    if let Some(ref title) = req.title {
        validate_title("Title", title)?;
    }
    if let Some(ref description) = req.description {
        validate_text("Description", description, DESCRIPTION_MAX)?;
    }
    if let Some(ref image_url) = req.image_url {
        validate_optional_link("image_url", image_url.as_ref())?;
    }
    if let Some(ref icon) = req.icon {
        validate_icon(icon)?;
    }
    validate_optional_order_index(req.order_index)
}
