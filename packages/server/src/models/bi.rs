//! Business-intelligence landing page: hero banner, feature cards, video and FAQ.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{validate_link, validate_optional_order_index, validate_text};
use crate::entity::{bi_faq, bi_feature, bi_hero, bi_video};
use crate::error::AppError;

/// Feature cards are grouped under these headings, in this order.
pub const FEATURE_CATEGORIES: &[&str] = &[
    "Integración de datos",
    "Big data",
    "Servicios de procesamiento",
    "Entrada de insights",
    "Gobernanza y seguridad",
];

const TITLE_MAX: usize = 200;
const DESCRIPTION_MAX: usize = 400;
const QUESTION_MAX: usize = 300;
const ANSWER_MAX: usize = 800;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct BiHeroRequest {
    #[schema(example = "Inteligencia de negocios")]
    pub title: String,
    pub description: String,
    pub image_url: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct BiHeroResponse {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub updated_at: DateTime<Utc>,
}

impl From<bi_hero::Model> for BiHeroResponse {
    fn from(m: bi_hero::Model) -> Self {
        Self {
            title: m.title,
            description: m.description,
            image_url: m.image_url,
            updated_at: m.updated_at,
        }
    }
}

pub fn validate_bi_hero(req: &BiHeroRequest) -> Result<(), AppError> {
    validate_text("Title", &req.title, TITLE_MAX)?;
    validate_text("Description", &req.description, DESCRIPTION_MAX)?;
    validate_link("image_url", &req.image_url)
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct BiVideoRequest {
    #[schema(example = "https://www.youtube.com/embed/abc123")]
    pub video_url: String,
    pub title: String,
    pub description: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct BiVideoResponse {
    pub video_url: String,
    pub title: String,
    pub description: String,
    pub updated_at: DateTime<Utc>,
}

impl From<bi_video::Model> for BiVideoResponse {
    fn from(m: bi_video::Model) -> Self {
        Self {
            video_url: m.video_url,
            title: m.title,
            description: m.description,
            updated_at: m.updated_at,
        }
    }
}

pub fn validate_bi_video(req: &BiVideoRequest) -> Result<(), AppError> {
    validate_link("video_url", &req.video_url)?;
    validate_text("Title", &req.title, TITLE_MAX)?;
    validate_text("Description", &req.description, DESCRIPTION_MAX)
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateBiFeatureRequest {
    /// One of the fixed feature categories.
    #[schema(example = "Big data")]
    pub category: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub order_index: Option<i32>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateBiFeatureRequest {
    pub category: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub order_index: Option<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct BiFeatureResponse {
    pub id: i32,
    pub category: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<bi_feature::Model> for BiFeatureResponse {
    fn from(m: bi_feature::Model) -> Self {
        Self {
            id: m.id,
            category: m.category,
            title: m.title,
            description: m.description,
            image_url: m.image_url,
            order_index: m.order_index,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

fn validate_category(category: &str) -> Result<(), AppError> {
    if !FEATURE_CATEGORIES.contains(&category.trim()) {
        return Err(AppError::Validation(format!(
            "Category must be one of: {}",
            FEATURE_CATEGORIES.join(", ")
        )));
    }
    Ok(())
}

pub fn validate_create_bi_feature(req: &CreateBiFeatureRequest) -> Result<(), AppError> {
    validate_category(&req.category)?;
    validate_text("Title", &req.title, TITLE_MAX)?;
    validate_text("Description", &req.description, DESCRIPTION_MAX)?;
    validate_link("image_url", &req.image_url)?;
    validate_optional_order_index(req.order_index)
}

pub fn validate_update_bi_feature(req: &UpdateBiFeatureRequest) -> Result<(), AppError> {
    if let Some(ref category) = req.category {
        validate_category(category)?;
    }
    if let Some(ref title) = req.title {
        validate_text("Title", title, TITLE_MAX)?;
    }
    if let Some(ref description) = req.description {
        validate_text("Description", description, DESCRIPTION_MAX)?;
    }
    if let Some(ref image_url) = req.image_url {
        validate_link("image_url", image_url)?;
    }
    validate_optional_order_index(req.order_index)
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateBiFaqRequest {
    #[schema(example = "¿Qué herramientas usan?")]
    pub question: String,
    pub answer: String,
    pub order_index: Option<i32>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateBiFaqRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub order_index: Option<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct BiFaqResponse {
    pub id: i32,
    pub question: String,
    pub answer: String,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<bi_faq::Model> for BiFaqResponse {
    fn from(m: bi_faq::Model) -> Self {
        Self {
            id: m.id,
            question: m.question,
            answer: m.answer,
            order_index: m.order_index,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

pub fn validate_create_bi_faq(req: &CreateBiFaqRequest) -> Result<(), AppError> {
    validate_text("Question", &req.question, QUESTION_MAX)?;
    validate_text("Answer", &req.answer, ANSWER_MAX)?;
    validate_optional_order_index(req.order_index)
}

pub fn validate_update_bi_faq(req: &UpdateBiFaqRequest) -> Result<(), AppError> {
    if let Some(ref question) = req.question {
        validate_text("Question", question, QUESTION_MAX)?;
    }
    if let Some(ref answer) = req.answer {
        validate_text("Answer", answer, ANSWER_MAX)?;
    }
    validate_optional_order_index(req.order_index)
}

/// Everything the BI landing page renders, in one response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct BiPageResponse {
    /// Absent until the banner has been saved once.
    pub hero: Option<BiHeroResponse>,
    pub features: Vec<BiFeatureResponse>,
    pub video: Option<BiVideoResponse>,
    pub faqs: Vec<BiFaqResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(category: &str) -> CreateBiFeatureRequest {
        CreateBiFeatureRequest {
            category: category.into(),
            title: "Pipelines ETL".into(),
            description: "Integramos tus fuentes".into(),
            image_url: "https://cdn.example.com/etl.png".into(),
            order_index: None,
        }
    }

    #[test]
    fn feature_category_must_be_known() {
        assert!(validate_create_bi_feature(&feature("Big data")).is_ok());
        assert!(validate_create_bi_feature(&feature("Machine learning")).is_err());
        assert!(validate_create_bi_feature(&feature("big data")).is_err());
    }

    #[test]
    fn bi_title_limit_is_tighter_than_default() {
        let mut req = feature("Big data");
        req.title = "t".repeat(TITLE_MAX + 1);
        assert!(validate_create_bi_feature(&req).is_err());
    }

    #[test]
    fn faq_answer_is_bounded() {
        let req = CreateBiFaqRequest {
            question: "¿Cuánto cuesta?".into(),
            answer: "a".repeat(ANSWER_MAX + 1),
            order_index: None,
        };
        assert!(validate_create_bi_faq(&req).is_err());
    }

    #[test]
    fn video_url_must_be_a_link() {
        let req = BiVideoRequest {
            video_url: "youtube".into(),
            title: "Demo".into(),
            description: "Recorrido".into(),
        };
        assert!(validate_bi_video(&req).is_err());
    }
}
