use serde::{Deserialize, Serialize};

use crate::errors::{CrmError, ValidationErrors};
use crate::types::db::user;

use super::common::{require_email, require_text, NAME_MAX};

/// Operator-supplied user details
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    /// Role names, each must already exist
    #[serde(default)]
    pub roles: Vec<String>,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), CrmError> {
        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "name", "Name", &self.name, NAME_MAX);
        require_email(&mut errors, "email", &self.email);
        errors.into_result()
    }
}

/// A user with the names of the roles they hold
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub user: user::Model,
    pub roles: Vec<String>,
}
