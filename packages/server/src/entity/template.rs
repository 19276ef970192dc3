use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A purchasable artifact (Excel, Python, Power BI) listed in the portfolio.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "template")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    pub description: String,
    pub image_url: Option<String>,

    /// NULL when uncategorized or after the category was deleted.
    pub category_id: Option<i32>,
    #[sea_orm(belongs_to, from = "category_id", to = "id")]
    pub category: HasOne<super::template_category::Entity>,

    /// Price in soles. NULL means "ask for a quote".
    pub price: Option<f64>,
    #[sea_orm(default_value = false)]
    pub is_featured: bool,
    pub purchase_url: Option<String>,

    #[sea_orm(has_many, via = "template_keyword")]
    pub keywords: HasMany<super::keyword::Entity>,

    #[sea_orm(default_value = 0)]
    pub order_index: i32,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
