use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{CrmError, ValidationErrors};
use crate::types::db::deal;

use super::common::{amount_to_cents, require_text, NAME_MAX};

pub const DEFAULT_PROBABILITY: i32 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DealInput {
    pub name: String,
    pub contact_id: i64,
    pub deal_stage_id: i64,
    pub amount: Decimal,
    pub closing_date: Option<NaiveDate>,
    /// 0..=100, defaults to 50
    pub probability: Option<i32>,
    /// Defaults to the caller on create
    pub assigned_to_id: Option<i64>,
    pub description: Option<String>,
}

/// Validated deal values ready to persist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DealFigures {
    pub amount_cents: i64,
    pub probability: i32,
}

impl DealInput {
    pub fn validate(&self) -> Result<DealFigures, CrmError> {
        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "name", "Deal name", &self.name, NAME_MAX);
        let amount_cents = amount_to_cents(&mut errors, "amount", self.amount);
        let probability = self.probability.unwrap_or(DEFAULT_PROBABILITY);
        if !(0..=100).contains(&probability) {
            errors.add("probability", "Probability must be between 0 and 100.");
        }
        errors.into_result()?;

        Ok(DealFigures {
            amount_cents: amount_cents.unwrap_or_default(),
            probability,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DealFilter {
    pub search: Option<String>,
    pub stage_id: Option<i64>,
    pub assigned_to_id: Option<i64>,
    pub closing_date_from: Option<NaiveDate>,
    pub closing_date_to: Option<NaiveDate>,
    /// Include soft-deleted deals; requires `delete-all-deals`
    pub with_trashed: bool,
}

/// A deal with its money values in decimal form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DealSummary {
    pub deal: deal::Model,
    pub amount: Decimal,
    pub expected_revenue: Decimal,
}

impl From<deal::Model> for DealSummary {
    fn from(deal: deal::Model) -> Self {
        Self {
            amount: deal.amount(),
            expected_revenue: deal.expected_revenue(),
            deal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn input(amount: &str, probability: Option<i32>) -> DealInput {
        DealInput {
            name: "Renewal".to_string(),
            contact_id: 1,
            deal_stage_id: 1,
            amount: Decimal::from_str(amount).unwrap(),
            closing_date: None,
            probability,
            assigned_to_id: None,
            description: None,
        }
    }

    #[test]
    fn test_defaults_probability_and_converts_amount() {
        let figures = input("1500.25", None).validate().unwrap();
        assert_eq!(figures, DealFigures { amount_cents: 150025, probability: 50 });
    }

    #[test]
    fn test_rejects_out_of_range_probability() {
        assert!(matches!(input("10", Some(101)).validate(), Err(CrmError::Validation(_))));
        assert!(matches!(input("10", Some(-1)).validate(), Err(CrmError::Validation(_))));
        assert!(input("10", Some(0)).validate().is_ok());
    }

    #[test]
    fn test_rejects_sub_cent_amounts() {
        assert!(matches!(input("10.005", None).validate(), Err(CrmError::Validation(_))));
    }
}
