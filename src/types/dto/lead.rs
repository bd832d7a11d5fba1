use serde::{Deserialize, Serialize};

use crate::errors::{CrmError, ValidationErrors};
use crate::types::db::{contact, lead};
use crate::types::db::lead::{LeadSource, LeadStatus};

use super::common::{optional_text, require_email, require_text, NAME_MAX, PHONE_MAX};

/// Full lead payload, used for both create and update
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LeadInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub source: LeadSource,
    /// Defaults to New
    pub status: Option<LeadStatus>,
    /// Defaults to the caller on create
    pub assigned_to_id: Option<i64>,
    pub notes: Option<String>,
}

impl LeadInput {
    pub fn validate(&self) -> Result<(), CrmError> {
        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "first_name", "First name", &self.first_name, NAME_MAX);
        require_text(&mut errors, "last_name", "Last name", &self.last_name, NAME_MAX);
        require_email(&mut errors, "email", &self.email);
        optional_text(&mut errors, "phone_number", "Phone number", self.phone_number.as_deref(), PHONE_MAX);
        if self.status == Some(LeadStatus::Converted) {
            errors.add("status", "Leads can only be marked Converted by converting them.");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LeadFilter {
    pub search: Option<String>,
    pub status: Option<LeadStatus>,
    pub source: Option<LeadSource>,
    pub assigned_to_id: Option<i64>,
    /// Include soft-deleted leads; requires `delete-all-leads`
    pub with_trashed: bool,
}

/// Optional values applied to the contact created by a conversion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConvertLeadOverrides {
    pub company_id: Option<i64>,
    pub owner_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadConversion {
    pub contact: contact::Model,
    pub lead: lead::Model,
}
