//! Template categories and keywords.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{validate_icon, validate_text};
use crate::entity::{keyword, template_category};
use crate::error::AppError;

const NAME_MAX: usize = 64;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCategoryRequest {
    /// Unique category name.
    #[schema(example = "Power BI")]
    pub name: String,
    #[schema(example = "BarChart")]
    pub icon: String,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub icon: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    pub icon: String,
    pub created_at: DateTime<Utc>,
}

impl From<template_category::Model> for CategoryResponse {
    fn from(m: template_category::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            icon: m.icon,
            created_at: m.created_at,
        }
    }
}

/// Category as embedded in a template.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CategorySummary {
    pub id: i32,
    pub name: String,
    pub icon: String,
}

impl From<template_category::Model> for CategorySummary {
    fn from(m: template_category::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            icon: m.icon,
        }
    }
}

fn validate_name(name: &str) -> Result<(), AppError> {
    validate_text("Name", name, NAME_MAX)
}

pub fn validate_create_category(req: &CreateCategoryRequest) -> Result<(), AppError> {
    validate_name(&req.name)?;
    validate_icon(&req.icon)
}

pub fn validate_update_category(req: &UpdateCategoryRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_name(name)?;
    }
    if let Some(ref icon) = req.icon {
        validate_icon(icon)?;
    }
    Ok(())
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct KeywordRequest {
    /// Unique keyword.
    #[schema(example = "dashboard")]
    pub name: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct KeywordResponse {
    pub id: i32,
    pub name: String,
}

impl From<keyword::Model> for KeywordResponse {
    fn from(m: keyword::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}

pub fn validate_keyword(req: &KeywordRequest) -> Result<(), AppError> {
    validate_name(&req.name)
}
