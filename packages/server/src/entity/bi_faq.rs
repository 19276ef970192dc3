use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bi_faq")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub question: String,
    pub answer: String,

    #[sea_orm(default_value = 0)]
    pub order_index: i32,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
