use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{
    double_option, validate_optional_link, validate_optional_order_index, validate_title,
};
use crate::entity::client;
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateClientRequest {
    #[schema(example = "Minera Andina")]
    pub name: String,
    pub logo_url: Option<String>,
    pub order_index: Option<i32>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateClientRequest {
    pub name: Option<String>,
    /// `null` or `""` removes the image.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub logo_url: Option<Option<String>>,
    pub order_index: Option<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ClientResponse {
    pub id: i32,
    pub name: String,
    pub logo_url: Option<String>,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<client::Model> for ClientResponse {
    fn from(m: client::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            logo_url: m.logo_url,
            order_index: m.order_index,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

pub fn validate_create_client(req: &CreateClientRequest) -> Result<(), AppError> {
    validate_title("Name", &req.name)?;
    validate_optional_link("logo_url", req.logo_url.as_ref())?;
    validate_optional_order_index(req.order_index)
}

pub fn validate_update_client(req: &UpdateClientRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_title("Name", name)?;
    }
    if let Some(ref logo_url) = req.logo_url {
        validate_optional_link("logo_url", logo_url.as_ref())?;
    }
    validate_optional_order_index(req.order_index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logo_may_be_left_empty() {
        let mut req = CreateClientRequest {
            name: "Minera Andina".into(),
            logo_url: Some("".into()),
            order_index: None,
        };
        assert!(validate_create_client(&req).is_ok());
        req.logo_url = Some("logo.png".into());
        assert!(validate_create_client(&req).is_err());
    }

    #[test]
    fn null_logo_update_clears_it() {
        let req: UpdateClientRequest = serde_json::from_str(r#"{"logo_url":null}"#).unwrap();
        assert_eq!(req.logo_url, Some(None));
    }

    #[test]
    fn blank_name_update_is_rejected() {
        let req = UpdateClientRequest {
            name: Some("   ".into()),
            ..Default::default()
        };
        assert!(validate_update_client(&req).is_err());
    }
}
