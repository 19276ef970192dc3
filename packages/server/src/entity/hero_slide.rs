use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Landing-page carousel item.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "hero_slide")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    /// Emphasized fragment rendered after the title.
    pub highlight: String,
    pub description: String,
    pub image_url: Option<String>,

    #[sea_orm(default_value = 0)]
    pub order_index: i32,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
