use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Singleton.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bi_video")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub video_url: String,
    pub title: String,
    pub description: String,

    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
