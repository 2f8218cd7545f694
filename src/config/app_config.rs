use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::errors::{CertCryptError, Result};

/// Current format version supported by this build of certcrypt.
pub const CURRENT_FORMAT_VERSION: u32 = 1;

/// Optional user configuration read from `config.toml`.
///
/// ```toml
/// [certcrypt]
/// certificate = "certs/ops.pem"
/// key = "certs/ops.key"
/// ```
///
/// Relative paths are resolved against the directory holding the file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub certcrypt: CertCryptSection,

    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

/// The `[certcrypt]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct CertCryptSection {
    /// Format version for backward compatibility. Defaults to 1 if missing.
    #[serde(default = "default_format_version")]
    pub format_version: u32,
    /// Default certificate file.
    pub certificate: Option<String>,
    /// Default private key file.
    pub key: Option<String>,
}

impl Default for CertCryptSection {
    fn default() -> Self {
        Self {
            format_version: default_format_version(),
            certificate: None,
            key: None,
        }
    }
}

fn default_format_version() -> u32 {
    1
}

impl AppConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the per-user default
    /// location is used if present, and built-in defaults otherwise.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        match explicit {
            Some(path) => {
                let path = PathBuf::from(path);
                if !path.exists() {
                    return Err(CertCryptError::FileNotFound { path });
                }
                Self::from_file(&path)
            }
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// `<config dir>/certcrypt/config.toml`, e.g. `~/.config/certcrypt/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("certcrypt").join("config.toml"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content).map_err(|e| match e {
            CertCryptError::InvalidConfig { detail } => CertCryptError::InvalidConfig {
                detail: format!("{}: {detail}", path.display()),
            },
            other => other,
        })?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| CertCryptError::InvalidConfig {
            detail: format!("Failed to parse config.toml: {e}"),
        })?;

        if config.certcrypt.format_version > CURRENT_FORMAT_VERSION {
            return Err(CertCryptError::InvalidConfig {
                detail: format!(
                    "format_version {} is newer than this build supports ({CURRENT_FORMAT_VERSION}). \
                     Update certcrypt.",
                    config.certcrypt.format_version
                ),
            });
        }

        Ok(config)
    }

    pub fn certificate_path(&self) -> Option<PathBuf> {
        self.certcrypt.certificate.as_deref().map(|p| self.resolve(p))
    }

    pub fn key_path(&self) -> Option<PathBuf> {
        self.certcrypt.key.as_deref().map(|p| self.resolve(p))
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config.certcrypt.format_version, 1);
        assert!(config.certificate_path().is_none());
        assert!(config.key_path().is_none());
    }

    #[test]
    fn reads_certificate_and_key() {
        let config = AppConfig::parse(
            "[certcrypt]\ncertificate = \"/etc/certs/ops.pem\"\nkey = \"/etc/certs/ops.key\"\n",
        )
        .unwrap();

        assert_eq!(
            config.certificate_path(),
            Some(PathBuf::from("/etc/certs/ops.pem"))
        );
        assert_eq!(config.key_path(), Some(PathBuf::from("/etc/certs/ops.key")));
    }

    #[test]
    fn relative_paths_follow_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[certcrypt]\ncertificate = \"certs/a.pem\"\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(
            config.certificate_path(),
            Some(dir.path().join("certs").join("a.pem"))
        );
    }

    #[test]
    fn newer_format_version_is_rejected() {
        let err = AppConfig::parse("[certcrypt]\nformat_version = 2\n").unwrap_err();
        assert!(matches!(err, CertCryptError::InvalidConfig { .. }));
        assert!(err.to_string().contains("newer than this build"));
    }

    #[test]
    fn malformed_toml_is_rejected() {
        let err = AppConfig::parse("[certcrypt\n").unwrap_err();
        assert!(err.to_string().contains("Failed to parse config.toml"));
    }

    #[test]
    fn missing_explicit_file_is_reported() {
        let err = AppConfig::load(Some("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, CertCryptError::FileNotFound { .. }));
    }
}
