use std::fmt;
use std::sync::Arc;

use crate::config::config_spec::ConfigSpec;
use crate::config::errors::ApplicationError;
use crate::config::EnvironmentProvider;
use crate::types::dto::PageLimits;

/// Settings needed before anything else can start
pub struct BootstrapSettings {
    database_url: String,
    default_page_size: u64,
    max_page_size: u64,
}

impl BootstrapSettings {
    /// Load bootstrap settings from environment variables using ConfigSpec
    pub fn from_env_provider(env_provider: Arc<dyn EnvironmentProvider + Send + Sync>) -> Result<Self, ApplicationError> {
        let database_url_spec = ConfigSpec::new(env_provider.clone())
            .env_override("DATABASE_URL")
            .default_value("sqlite://crm.db?mode=rwc")
            .min_length(1)
            .validator(ConfigSpec::validate_database_url);

        let default_page_size_spec = ConfigSpec::new(env_provider.clone())
            .env_override("DEFAULT_PAGE_SIZE")
            .default_value("15")
            .validator(|value| ConfigSpec::validate_integer_range(value, 1, 100));

        let max_page_size_spec = ConfigSpec::new(env_provider)
            .env_override("MAX_PAGE_SIZE")
            .default_value("100")
            .validator(|value| ConfigSpec::validate_integer_range(value, 1, 1000));

        let database_url = database_url_spec.load_setting_with_source()?.value;

        let default_page_size = ConfigSpec::parse_unsigned(
            &default_page_size_spec.load_setting_with_source()?.value,
            "DEFAULT_PAGE_SIZE",
        )?;
        let max_page_size = ConfigSpec::parse_unsigned(
            &max_page_size_spec.load_setting_with_source()?.value,
            "MAX_PAGE_SIZE",
        )?;

        if default_page_size > max_page_size {
            return Err(ApplicationError::InvalidSetting {
                setting_name: "DEFAULT_PAGE_SIZE".to_string(),
                reason: format!(
                    "Value {} exceeds MAX_PAGE_SIZE {}",
                    default_page_size, max_page_size
                ),
            });
        }

        Ok(Self {
            database_url,
            default_page_size,
            max_page_size,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, ApplicationError> {
        use crate::config::SystemEnvironment;
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn default_page_size(&self) -> u64 {
        self.default_page_size
    }

    pub fn max_page_size(&self) -> u64 {
        self.max_page_size
    }

    pub fn page_limits(&self) -> PageLimits {
        PageLimits {
            default_per_page: self.default_page_size,
            max_per_page: self.max_page_size,
        }
    }
}

impl fmt::Debug for BootstrapSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Connection strings may carry credentials
        let database_url = match self.database_url.split_once('@') {
            Some((_, host)) => format!("***@{}", host),
            None => self.database_url.clone(),
        };

        f.debug_struct("BootstrapSettings")
            .field("database_url", &database_url)
            .field("default_page_size", &self.default_page_size)
            .field("max_page_size", &self.max_page_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    fn load(env: MockEnvironment) -> Result<BootstrapSettings, ApplicationError> {
        BootstrapSettings::from_env_provider(Arc::new(env))
    }

    #[test]
    fn test_bootstrap_settings_with_defaults() {
        let settings = load(MockEnvironment::empty()).unwrap();

        assert_eq!(settings.database_url(), "sqlite://crm.db?mode=rwc");
        assert_eq!(settings.default_page_size(), 15);
        assert_eq!(settings.max_page_size(), 100);
        assert_eq!(settings.page_limits(), PageLimits::default());
    }

    #[test]
    fn test_bootstrap_settings_from_env() {
        let settings = load(MockEnvironment::empty().with_vars(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("DEFAULT_PAGE_SIZE", "25"),
            ("MAX_PAGE_SIZE", "250"),
        ]))
        .unwrap();

        assert_eq!(settings.database_url(), "sqlite::memory:");
        assert_eq!(
            settings.page_limits(),
            PageLimits {
                default_per_page: 25,
                max_per_page: 250
            }
        );
    }

    #[test]
    fn test_page_size_out_of_range() {
        let result = load(MockEnvironment::empty().with_var("DEFAULT_PAGE_SIZE", "0"));
        assert!(matches!(
            result,
            Err(ApplicationError::InvalidSetting { ref setting_name, .. }) if setting_name == "DEFAULT_PAGE_SIZE"
        ));

        let result = load(MockEnvironment::empty().with_var("MAX_PAGE_SIZE", "5000"));
        assert!(result.is_err());
    }

    #[test]
    fn test_default_page_size_above_max() {
        let result = load(MockEnvironment::empty().with_vars(&[
            ("DEFAULT_PAGE_SIZE", "50"),
            ("MAX_PAGE_SIZE", "20"),
        ]));

        match result {
            Err(ApplicationError::InvalidSetting { setting_name, reason }) => {
                assert_eq!(setting_name, "DEFAULT_PAGE_SIZE");
                assert!(reason.contains("exceeds MAX_PAGE_SIZE"));
            }
            other => panic!("Expected InvalidSetting, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_unsupported_database_url() {
        let result = load(MockEnvironment::empty().with_var("DATABASE_URL", "redis://cache"));
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_masks_credentials() {
        let settings = load(
            MockEnvironment::empty().with_var("DATABASE_URL", "postgres://crm:secret@db:5432/crm"),
        )
        .unwrap();

        let debug = format!("{:?}", settings);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("db:5432/crm"));
    }
}
