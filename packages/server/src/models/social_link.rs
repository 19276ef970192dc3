use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{validate_icon, validate_link, validate_optional_order_index, validate_text};
use crate::entity::social_link;
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateSocialLinkRequest {
    #[schema(example = "LinkedIn")]
    pub platform: String,
    #[schema(example = "https://www.linkedin.com/company/datodirecto")]
    pub url: String,
    #[schema(example = "Linkedin")]
    pub icon: String,
    pub order_index: Option<i32>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateSocialLinkRequest {
    pub platform: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub order_index: Option<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SocialLinkResponse {
    pub id: i32,
    pub platform: String,
    pub url: String,
    pub icon: String,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<social_link::Model> for SocialLinkResponse {
    fn from(m: social_link::Model) -> Self {
        Self {
            id: m.id,
            platform: m.platform,
            url: m.url,
            icon: m.icon,
            order_index: m.order_index,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

fn validate_platform(platform: &str) -> Result<(), AppError> {
    validate_text("Platform", platform, 64)
}

pub fn validate_create_social_link(req: &CreateSocialLinkRequest) -> Result<(), AppError> {
    validate_platform(&req.platform)?;
    validate_link("url", &req.url)?;
    validate_icon(&req.icon)?;
    validate_optional_order_index(req.order_index)
}

pub fn validate_update_social_link(req: &UpdateSocialLinkRequest) -> Result<(), AppError> {
    if let Some(ref platform) = req.platform {
        validate_platform(platform)?;
    }
    if let Some(ref url) = req.url {
        validate_link("url", url)?;
    }
    if let Some(ref icon) = req.icon {
        validate_icon(icon)?;
    }
    validate_optional_order_index(req.order_index)
}
