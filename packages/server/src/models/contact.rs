use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, TITLE_MAX, validate_max_len, validate_text, validate_title};
use crate::entity::contact_message;
use crate::error::AppError;

const EMAIL_MAX: usize = 254;
const MESSAGE_MAX: usize = 5000;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct ContactRequest {
    #[schema(example = "Ana Pérez")]
    pub name: String,
    #[schema(example = "ana@empresa.pe")]
    pub email: String,
    pub company: Option<String>,
    #[schema(example = "Necesito un dashboard de ventas.")]
    pub message: String,
}

/// Result of a contact-form submission.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ContactSubmitted {
    pub id: i32,
    /// Whether the notification email was accepted. The message is stored
    /// either way.
    pub delivered: bool,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub message: String,
    pub delivered: bool,
    pub created_at: DateTime<Utc>,
}

impl From<contact_message::Model> for MessageResponse {
    fn from(m: contact_message::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            company: m.company,
            message: m.message,
            delivered: m.delivered,
            created_at: m.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MessageListResponse {
    pub data: Vec<MessageResponse>,
    pub pagination: Pagination,
}

/// Loose shape check: `local@domain.tld`, no whitespace.
fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

pub fn validate_contact(req: &ContactRequest) -> Result<(), AppError> {
    validate_title("Name", &req.name)?;
    let email = req.email.trim();
    if email.is_empty() || email.len() > EMAIL_MAX || !is_plausible_email(email) {
        return Err(AppError::Validation("Email is not valid".into()));
    }
    if let Some(ref company) = req.company {
        validate_max_len("Company", company, TITLE_MAX)?;
    }
    validate_text("Message", &req.message, MESSAGE_MAX)
}
