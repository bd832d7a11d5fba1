use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::ValidationErrors;

pub const DEFAULT_PER_PAGE: u64 = 15;
pub const MAX_PER_PAGE: u64 = 100;

/// Page size bounds, normally loaded from `DEFAULT_PAGE_SIZE` / `MAX_PAGE_SIZE`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_per_page: u64,
    pub max_per_page: u64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_per_page: DEFAULT_PER_PAGE,
            max_per_page: MAX_PER_PAGE,
        }
    }
}

/// 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: Option<u64>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, per_page: None }
    }
}

impl PageRequest {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page,
            per_page: Some(per_page),
        }
    }

    /// Returns `(page, per_page)` with the page at least 1 and per_page clamped to the limits
    pub fn resolve(&self, limits: &PageLimits) -> (u64, u64) {
        let per_page = self
            .per_page
            .unwrap_or(limits.default_per_page)
            .clamp(1, limits.max_per_page.max(1));
        (self.page.max(1), per_page)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub last_page: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, page: u64, per_page: u64) -> Self {
        let last_page = total.div_ceil(per_page.max(1)).max(1);
        Self {
            items,
            total,
            page,
            per_page,
            last_page,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            last_page: self.last_page,
        }
    }
}

pub const NAME_MAX: usize = 255;
pub const PHONE_MAX: usize = 20;

pub fn require_text(errors: &mut ValidationErrors, field: &str, label: &str, value: &str, max: usize) {
    if value.trim().is_empty() {
        errors.add(field, format!("{} is required.", label));
    } else if value.chars().count() > max {
        errors.add(field, format!("{} must not exceed {} characters.", label, max));
    }
}

pub fn optional_text(errors: &mut ValidationErrors, field: &str, label: &str, value: Option<&str>, max: usize) {
    if let Some(value) = value {
        if value.chars().count() > max {
            errors.add(field, format!("{} must not exceed {} characters.", label, max));
        }
    }
}

pub fn require_email(errors: &mut ValidationErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, "Email address is required.");
    } else if !is_valid_email(value) {
        errors.add(field, "Please provide a valid email address.");
    } else if value.chars().count() > NAME_MAX {
        errors.add(field, format!("Email address must not exceed {} characters.", NAME_MAX));
    }
}

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$"
    ).expect("Invalid email regex")
});

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// Absolute http(s) URL with a host
pub fn is_valid_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty()),
        Err(_) => false,
    }
}

/// Converts a money amount to integer cents.
///
/// Rejects negative amounts and amounts with more than two fractional digits.
pub fn amount_to_cents(errors: &mut ValidationErrors, field: &str, amount: Decimal) -> Option<i64> {
    if amount.is_sign_negative() && !amount.is_zero() {
        errors.add(field, "Deal amount must be at least 0.");
        return None;
    }
    if amount.normalize().scale() > 2 {
        errors.add(field, "Deal amount must have at most two decimal places.");
        return None;
    }
    match amount.checked_mul(Decimal::ONE_HUNDRED).and_then(|cents| cents.to_i64()) {
        Some(cents) => Some(cents),
        None => {
            errors.add(field, "Deal amount is too large.");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_page_request_resolution() {
        let limits = PageLimits::default();

        assert_eq!(PageRequest::default().resolve(&limits), (1, 15));
        assert_eq!(PageRequest::new(0, 10).resolve(&limits), (1, 10));
        assert_eq!(PageRequest::new(3, 500).resolve(&limits), (3, 100));
        assert_eq!(PageRequest::new(2, 0).resolve(&limits), (2, 1));
    }

    #[test]
    fn test_page_last_page() {
        assert_eq!(Page::<i32>::new(vec![], 0, 1, 15).last_page, 1);
        assert_eq!(Page::<i32>::new(vec![], 15, 1, 15).last_page, 1);
        assert_eq!(Page::<i32>::new(vec![], 16, 1, 15).last_page, 2);
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("jane@example.com"));
        assert!(!is_valid_email("jane.example.com"));
        assert!(!is_valid_email("jane@localhost"));
        assert!(!is_valid_email("ja ne@example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(is_valid_email("jane.o'neil+crm@mail.example.co"));
        assert!(!is_valid_email("jane@@example.com"));
    }

    #[test]
    fn test_url_validation() {
        assert!(is_valid_url("https://acme.test"));
        assert!(is_valid_url("http://acme.test/about"));
        assert!(!is_valid_url("acme.test"));
        assert!(!is_valid_url("https://"));
        assert!(!is_valid_url("ftp://acme.test"));
        assert!(!is_valid_url("https://acme .test"));
    }

    #[test]
    fn test_amount_to_cents() {
        let mut errors = ValidationErrors::new();

        assert_eq!(amount_to_cents(&mut errors, "amount", Decimal::from_str("1234.5").unwrap()), Some(123450));
        assert_eq!(amount_to_cents(&mut errors, "amount", Decimal::from_str("10.500").unwrap()), Some(1050));
        assert!(errors.is_empty());

        assert_eq!(amount_to_cents(&mut errors, "amount", Decimal::from_str("0.001").unwrap()), None);
        assert_eq!(amount_to_cents(&mut errors, "amount", Decimal::from_str("-5").unwrap()), None);
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_huge_amount_is_rejected() {
        let mut errors = ValidationErrors::new();

        assert_eq!(amount_to_cents(&mut errors, "amount", Decimal::MAX), None);
        assert_eq!(amount_to_cents(&mut errors, "amount", Decimal::from(i64::MAX)), None);
        let result = errors.into_result();
        match result {
            Err(crate::errors::CrmError::Validation(fields)) => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0].message, "Deal amount is too large.");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_require_text_counts_characters() {
        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "name", "Name", &"é".repeat(255), NAME_MAX);
        assert!(errors.is_empty());

        require_text(&mut errors, "name", "Name", "  ", NAME_MAX);
        assert!(!errors.is_empty());
    }
}
