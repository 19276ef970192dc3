use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{
    DESCRIPTION_MAX, validate_icon, validate_optional_order_index, validate_text, validate_title,
};
use crate::entity::payment_method;
use crate::error::AppError;

fn default_active() -> bool {
    true
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreatePaymentMethodRequest {
    #[schema(example = "Yape")]
    pub name: String,
    pub description: String,
    /// Account number, phone or other coordinates shown to buyers.
    #[schema(example = "987 654 321")]
    pub account_info: String,
    #[schema(example = "Smartphone")]
    pub icon: String,
    /// Default: true.
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub order_index: Option<i32>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdatePaymentMethodRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub account_info: Option<String>,
    pub icon: Option<String>,
    pub is_active: Option<bool>,
    pub order_index: Option<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PaymentMethodResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub account_info: String,
    pub icon: String,
    pub is_active: bool,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<payment_method::Model> for PaymentMethodResponse {
    fn from(m: payment_method::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            account_info: m.account_info,
            icon: m.icon,
            is_active: m.is_active,
            order_index: m.order_index,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

pub fn validate_create_payment_method(req: &CreatePaymentMethodRequest) -> Result<(), AppError> {
    validate_title("Name", &req.name)?;
    validate_text("Description", &req.description, DESCRIPTION_MAX)?;
    validate_text("Account info", &req.account_info, DESCRIPTION_MAX)?;
    validate_icon(&req.icon)?;
    validate_optional_order_index(req.order_index)
}

pub fn validate_update_payment_method(req: &UpdatePaymentMethodRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_title("Name", name)?;
    }
    if let Some(ref description) = req.description {
        validate_text("Description", description, DESCRIPTION_MAX)?;
    }
    if let Some(ref account_info) = req.account_info {
        validate_text("Account info", account_info, DESCRIPTION_MAX)?;
    }
    if let Some(ref icon) = req.icon {
        validate_icon(icon)?;
    }
    validate_optional_order_index(req.order_index)
}
