use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Singleton: at most one row.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "about_us")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub mission: String,
    pub vision: String,
    pub history: String,

    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
