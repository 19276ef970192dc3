use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "template_keyword")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub template_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub keyword_id: i32,
    #[sea_orm(belongs_to, from = "template_id", to = "id")]
    pub template: HasOne<super::template::Entity>,
    #[sea_orm(belongs_to, from = "keyword_id", to = "id")]
    pub keyword: HasOne<super::keyword::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
