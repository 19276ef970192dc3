use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Metadata of an image in the public bucket.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "image_object")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Object key in the bucket (`<sha256>.<ext>`).
    #[sea_orm(unique)]
    pub key: String,

    /// Filename as uploaded.
    pub filename: String,
    pub content_type: String,
    pub size: i64,
    pub width: i32,
    pub height: i32,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
