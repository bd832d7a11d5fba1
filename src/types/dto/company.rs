use serde::Deserialize;

use crate::errors::{CrmError, ValidationErrors};

use super::common::{is_valid_url, optional_text, require_text, NAME_MAX, PHONE_MAX};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompanyInput {
    pub name: String,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    /// Defaults to the caller on create
    pub owner_id: Option<i64>,
    pub notes: Option<String>,
}

impl CompanyInput {
    pub fn validate(&self) -> Result<(), CrmError> {
        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "name", "Company name", &self.name, NAME_MAX);
        optional_text(&mut errors, "industry", "Industry", self.industry.as_deref(), NAME_MAX);
        if let Some(website) = self.website.as_deref() {
            if !is_valid_url(website) {
                errors.add("website", "Please provide a valid website URL.");
            }
        }
        optional_text(&mut errors, "website", "Website", self.website.as_deref(), NAME_MAX);
        optional_text(&mut errors, "phone_number", "Phone number", self.phone_number.as_deref(), PHONE_MAX);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompanyFilter {
    pub search: Option<String>,
    pub industry: Option<String>,
    pub owner_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_website_must_be_url() {
        let input = CompanyInput {
            name: "Acme".to_string(),
            industry: None,
            website: Some("acme".to_string()),
            phone_number: None,
            address: None,
            owner_id: None,
            notes: None,
        };

        match input.validate() {
            Err(CrmError::Validation(fields)) => assert_eq!(fields[0].field, "website"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
