use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "social_link")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub platform: String,
    pub url: String,
    /// Icon name understood by the front end (e.g. "Linkedin", "FaTiktok").
    pub icon: String,

    #[sea_orm(default_value = 0)]
    pub order_index: i32,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
