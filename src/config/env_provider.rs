#[cfg(test)]
use std::collections::HashMap;

/// Source of environment variables for settings
///
/// Settings read through this trait so tests can inject values without touching the
/// process environment.
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;
}

/// Reads the process environment (after `.env` has been loaded)
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory environment for tests
#[cfg(test)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

#[cfg(test)]
impl MockEnvironment {
    pub fn new(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }

    pub fn empty() -> Self {
        Self::new(HashMap::new())
    }

    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_vars(mut self, vars: &[(&str, &str)]) -> Self {
        for (key, value) in vars {
            self.vars.insert(key.to_string(), value.to_string());
        }
        self
    }
}

#[cfg(test)]
impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_environment_missing_var() {
        assert_eq!(SystemEnvironment.get_var("CRM_NON_EXISTENT_VAR_98765"), None);
    }

    #[test]
    fn test_mock_environment_provider() {
        let provider = MockEnvironment::empty()
            .with_var("DATABASE_URL", "sqlite::memory:")
            .with_var("LOG_LEVEL", "debug");

        assert_eq!(provider.get_var("DATABASE_URL"), Some("sqlite::memory:".to_string()));
        assert_eq!(provider.get_var("LOG_LEVEL"), Some("debug".to_string()));
        assert_eq!(provider.get_var("NON_EXISTENT"), None);
    }

    #[test]
    fn test_mock_environment_with_vars_overrides() {
        let provider = MockEnvironment::new(HashMap::from([(
            "DEFAULT_PAGE_SIZE".to_string(),
            "10".to_string(),
        )]))
        .with_vars(&[("DEFAULT_PAGE_SIZE", "20"), ("MAX_PAGE_SIZE", "50")]);

        assert_eq!(provider.get_var("DEFAULT_PAGE_SIZE"), Some("20".to_string()));
        assert_eq!(provider.get_var("MAX_PAGE_SIZE"), Some("50".to_string()));
    }
}
