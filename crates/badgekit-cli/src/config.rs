//! CLI configuration loading and management.

use serde::{Deserialize, Serialize};
use std::path::Path;

use badgekit_core::VerificationPolicy;
use badgekit_credentials::StaticRevocationList;

/// Full configuration for the Badgekit CLI.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BadgekitConfig {
    /// Trust policy for `verify`.
    #[serde(default)]
    pub verification: VerificationPolicy,

    /// Local revocation list.
    #[serde(default)]
    pub revocation: RevocationConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RevocationConfig {
    /// Ids of revoked credentials.
    #[serde(default)]
    pub revoked: Vec<String>,
    /// Treat ids missing from `revoked` as valid rather than unknown.
    #[serde(default)]
    pub authoritative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".into()
}
fn default_log_format() -> String {
    "text".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl RevocationConfig {
    /// Whether any revocation data is configured.
    pub fn is_configured(&self) -> bool {
        self.authoritative || !self.revoked.is_empty()
    }

    /// Build the in-memory revocation list this config describes.
    pub fn to_list(&self) -> StaticRevocationList {
        StaticRevocationList::from_revoked(self.revoked.iter().cloned(), self.authoritative)
    }
}

impl BadgekitConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: BadgekitConfig = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save the current config to a TOML file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use badgekit_credentials::RevocationStatus;

    #[test]
    fn test_default_config() {
        let config = BadgekitConfig::default();
        assert!(!config.verification.reject_expired);
        assert!(!config.verification.reject_revoked);
        assert!(config.revocation.revoked.is_empty());
        assert!(!config.revocation.is_configured());
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, "text");
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = BadgekitConfig {
            verification: VerificationPolicy::strict(),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let decoded: BadgekitConfig = toml::from_str(&toml_str).expect("deserialize");
        assert!(decoded.verification.reject_expired);
        assert!(decoded.verification.reject_revoked);
    }

    #[test]
    fn test_config_load_nonexistent_uses_defaults() {
        let config = BadgekitConfig::load(Path::new("/nonexistent/badgekit.toml")).unwrap();
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_config_from_toml_partial() {
        let toml_str = r#"
[verification]
reject_revoked = true

[revocation]
revoked = ["urn:uuid:1", "urn:uuid:2"]
"#;
        let config: BadgekitConfig = toml::from_str(toml_str).expect("parse");
        assert!(config.verification.reject_revoked);
        assert!(!config.verification.reject_expired);
        assert!(config.revocation.is_configured());
        // Defaults for unspecified
        assert_eq!(config.logging.format, "text");

        let list = config.revocation.to_list();
        assert_eq!(list.count(), 2);
        assert_eq!(list.status("urn:uuid:1"), RevocationStatus::Revoked);
        assert_eq!(list.status("urn:uuid:3"), RevocationStatus::Unknown);
    }

    #[test]
    fn test_config_save_and_load() {
        let path = std::env::temp_dir()
            .join(format!("badgekit-config-{}", std::process::id()))
            .join("badgekit.toml");
        let config = BadgekitConfig {
            revocation: RevocationConfig {
                revoked: vec!["urn:uuid:9".into()],
                authoritative: true,
            },
            ..Default::default()
        };
        config.save(&path).unwrap();
        let loaded = BadgekitConfig::load(&path).unwrap();
        assert_eq!(loaded.revocation.revoked, vec!["urn:uuid:9"]);
        assert!(loaded.revocation.authoritative);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
