use serde::Deserialize;

use crate::errors::{CrmError, ValidationErrors};

use super::common::{optional_text, require_email, require_text, NAME_MAX, PHONE_MAX};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContactInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub company_id: Option<i64>,
    /// Defaults to the caller on create
    pub owner_id: Option<i64>,
    pub notes: Option<String>,
}

impl ContactInput {
    pub fn validate(&self) -> Result<(), CrmError> {
        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "first_name", "First name", &self.first_name, NAME_MAX);
        require_text(&mut errors, "last_name", "Last name", &self.last_name, NAME_MAX);
        require_email(&mut errors, "email", &self.email);
        optional_text(&mut errors, "phone_number", "Phone number", self.phone_number.as_deref(), PHONE_MAX);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContactFilter {
    pub search: Option<String>,
    pub company_id: Option<i64>,
    pub owner_id: Option<i64>,
}
