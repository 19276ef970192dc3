use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{LONG_TEXT_MAX, validate_text};
use crate::entity::about_us;
use crate::error::AppError;

/// Full replacement of the "about us" section.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct AboutUsRequest {
    #[schema(example = "Convertir datos en decisiones para las pymes peruanas.")]
    pub mission: String,
    pub vision: String,
    pub history: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AboutUsResponse {
    pub mission: String,
    pub vision: String,
    pub history: String,
    pub updated_at: DateTime<Utc>,
}

impl From<about_us::Model> for AboutUsResponse {
    fn from(m: about_us::Model) -> Self {
        Self {
            mission: m.mission,
            vision: m.vision,
            history: m.history,
            updated_at: m.updated_at,
        }
    }
}

pub fn validate_about_us(req: &AboutUsRequest) -> Result<(), AppError> {
    validate_text("Mission", &req.mission, LONG_TEXT_MAX)?;
    validate_text("Vision", &req.vision, LONG_TEXT_MAX)?;
    validate_text("History", &req.history, LONG_TEXT_MAX)
}
