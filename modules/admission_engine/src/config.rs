//! Configuration for the admission engine module

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Admission engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Public registration page; referral links are `{referral_base_url}?ref={attendee_id}`
    #[serde(default = "default_referral_base_url")]
    pub referral_base_url: String,

    /// Subject of the purchaser's confirmation message
    #[serde(default = "default_purchaser_subject")]
    pub purchaser_subject: String,

    /// Subject of a named guest's ticket message
    #[serde(default = "default_guest_subject")]
    pub guest_subject: String,

    /// Send confirmation messages for preview (test) submissions
    #[serde(default)]
    pub notify_test_submissions: bool,

    /// Name given to the seating configuration created on first use
    #[serde(default = "default_configuration_name")]
    pub default_configuration_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            referral_base_url: default_referral_base_url(),
            purchaser_subject: default_purchaser_subject(),
            guest_subject: default_guest_subject(),
            notify_test_submissions: false,
            default_configuration_name: default_configuration_name(),
        }
    }
}

impl Config {
    /// Defaults, then the optional YAML file, then `ADMISSION_*` environment variables
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        let config = figment.merge(Env::prefixed("ADMISSION_")).extract()?;
        Ok(config)
    }
}

fn default_referral_base_url() -> String {
    "http://localhost:8087/register".to_string()
}

fn default_purchaser_subject() -> String {
    "Your registration is confirmed".to_string()
}

fn default_guest_subject() -> String {
    "You're on the guest list".to_string()
}

fn default_configuration_name() -> String {
    "Main layout".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.purchaser_subject, "Your registration is confirmed");
        assert!(!config.notify_test_submissions);
    }

    #[test]
    fn test_yaml_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "referral_base_url: https://tickets.example.com/gala\nnotify_test_submissions: true"
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();

        assert_eq!(config.referral_base_url, "https://tickets.example.com/gala");
        assert!(config.notify_test_submissions);
        assert_eq!(config.guest_subject, default_guest_subject());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "retention_days: 30").unwrap();

        assert!(Config::load(Some(file.path())).is_err());
    }
}
