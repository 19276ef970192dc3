use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{
    DESCRIPTION_MAX, double_option, validate_optional_link, validate_optional_order_index,
    validate_text, validate_title,
};
use crate::entity::team_member;
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateTeamMemberRequest {
    #[schema(example = "Diego Salazar")]
    pub name: String,
    #[schema(example = "Data Engineer")]
    pub role: String,
    pub description: String,
    pub image_url: Option<String>,
    pub order_index: Option<i32>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateTeamMemberRequest {
    pub name: Option<String>,
    pub role: Option<String>,
    pub description: Option<String>,
    /// `null` removes the photo.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Option<String>>,
    pub order_index: Option<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TeamMemberResponse {
    pub id: i32,
    pub name: String,
    pub role: String,
    pub description: String,
    pub image_url: Option<String>,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<team_member::Model> for TeamMemberResponse {
    fn from(m: team_member::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            role: m.role,
            description: m.description,
            image_url: m.image_url,
            order_index: m.order_index,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

pub fn validate_create_team_member(req: &CreateTeamMemberRequest) -> Result<(), AppError> {
    validate_title("Name", &req.name)?;
    validate_title("Role", &req.role)?;
    validate_text("Description", &req.description, DESCRIPTION_MAX)?;
    validate_optional_link("image_url", req.image_url.as_ref())?;
    validate_optional_order_index(req.order_index)
}

pub fn validate_update_team_member(req: &UpdateTeamMemberRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_title("Name", name)?;
    }
    if let Some(ref role) = req.role {
        validate_title("Role", role)?;
    }
    if let Some(ref description) = req.description {
        validate_text("Description", description, DESCRIPTION_MAX)?;
    }
    if let Some(ref image_url) = req.image_url {
        validate_optional_link("image_url", image_url.as_ref())?;
    }
    validate_optional_order_index(req.order_index)
}
