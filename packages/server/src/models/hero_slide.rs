use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{
    DESCRIPTION_MAX, double_option, validate_optional_link, validate_optional_order_index,
    validate_text, validate_title,
};
use crate::entity::hero_slide;
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateHeroSlideRequest {
    #[schema(example = "Transformamos tus datos")]
    pub title: String,
    /// Emphasized fragment rendered after the title.
    #[schema(example = "en decisiones")]
    pub highlight: String,
    pub description: String,
    /// Background image. Google Drive share links are rewritten.
    #[schema(example = "/media/3f2a….png")]
    pub image_url: Option<String>,
    /// Position in the carousel. Appended at the end when omitted.
    pub order_index: Option<i32>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateHeroSlideRequest {
    pub title: Option<String>,
    pub highlight: Option<String>,
    pub description: Option<String>,
    /// `null` or `""` removes the image.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Option<String>>,
    pub order_index: Option<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct HeroSlideResponse {
    pub id: i32,
    pub title: String,
    pub highlight: String,
    pub description: String,
    pub image_url: Option<String>,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<hero_slide::Model> for HeroSlideResponse {
    fn from(m: hero_slide::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            highlight: m.highlight,
            description: m.description,
            image_url: m.image_url,
            order_index: m.order_index,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

pub fn validate_create_hero_slide(req: &CreateHeroSlideRequest) -> Result<(), AppError> {
    validate_title("Title", &req.title)?;
    validate_title("Highlight", &req.highlight)?;
    validate_text("Description", &req.description, DESCRIPTION_MAX)?;
    validate_optional_link("image_url", req.image_url.as_ref())?;
    validate_optional_order_index(req.order_index)
}

pub fn validate_update_hero_slide(req: &UpdateHeroSlideRequest) -> Result<(), AppError> {
    if let Some(ref title) = req.title {
        validate_title("Title", title)?;
    }
    if let Some(ref highlight) = req.highlight {
        validate_title("Highlight", highlight)?;
    }
    if let Some(ref description) = req.description {
        validate_text("Description", description, DESCRIPTION_MAX)?;
    }
    if let Some(ref image_url) = req.image_url {
        validate_optional_link("image_url", image_url.as_ref())?;
    }
    validate_optional_order_index(req.order_index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create() -> CreateHeroSlideRequest {
        CreateHeroSlideRequest {
            title: "Transformamos tus datos".into(),
            highlight: "en decisiones".into(),
            description: "Consultoría en analítica".into(),
            image_url: Some("https://cdn.example.com/hero.jpg".into()),
            order_index: None,
        }
    }

    #[test]
    fn all_text_fields_are_required() {
        assert!(validate_create_hero_slide(&create()).is_ok());

        let mut req = create();
        req.highlight = "  ".into();
        assert!(validate_create_hero_slide(&req).is_err());

        let mut req = create();
        req.description = String::new();
        assert!(validate_create_hero_slide(&req).is_err());
    }

    #[test]
    fn image_is_optional_but_must_be_a_link() {
        let mut req = create();
        req.image_url = None;
        assert!(validate_create_hero_slide(&req).is_ok());
        req.image_url = Some(String::new());
        assert!(validate_create_hero_slide(&req).is_ok());
        req.image_url = Some("hero.jpg".into());
        assert!(validate_create_hero_slide(&req).is_err());
    }

    #[test]
    fn negative_order_index_is_rejected() {
        let req = UpdateHeroSlideRequest {
            order_index: Some(-1),
            ..Default::default()
        };
        assert!(validate_update_hero_slide(&req).is_err());
    }
}
