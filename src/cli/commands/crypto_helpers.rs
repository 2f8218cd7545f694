use std::path::PathBuf;

use chrono::Utc;

use crate::adapters::cert_sources::pem_file_source::PemFileSource;
use crate::cli::CertArgs;
use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::core::errors::{CertCryptError, Result};
use crate::core::models::certificate::{Certificate, KeyMaterial};
use crate::core::traits::certificate_source::CertificateSource;

/// Resolve the certificate location from flags, environment, then config,
/// and load it.
pub fn load_certificate(args: &CertArgs, config: &AppConfig) -> Result<Certificate> {
    let cert_path = args
        .cert
        .as_deref()
        .map(PathBuf::from)
        .or_else(|| config.certificate_path())
        .ok_or_else(|| CertCryptError::ArgumentError {
            detail: "No certificate given.\n\n  \
                     Solutions:\n    \
                     → Pass it: --cert <path>\n    \
                     → Export CERTCRYPT_CERT=<path>\n    \
                     → Set 'certificate' in the [certcrypt] section of config.toml"
                .into(),
        })?;
    let key_path = args
        .key
        .as_deref()
        .map(PathBuf::from)
        .or_else(|| config.key_path());

    let source = PemFileSource::new(cert_path)
        .with_key(key_path)
        .with_password(args.password.clone());

    output::detail(&format!("Certificate: {}", source.describe()));
    let certificate = source.load()?;
    describe_certificate(&certificate);

    Ok(certificate)
}

fn describe_certificate(certificate: &Certificate) {
    output::detail(&format!("Subject: {}", certificate.subject()));
    if let Ok(key_id) = certificate.key_id() {
        output::detail(&format!("Key id: {key_id}"));
    }
    let private_key = match certificate.keys() {
        _ if certificate.has_private_key() => "available".to_string(),
        KeyMaterial::PublicOnly {
            private_key_note: Some(note),
            ..
        } => format!("not available ({note})"),
        _ => "not available".to_string(),
    };
    output::detail(&format!("Private key: {private_key}"));

    if let Some(end) = certificate.not_after() {
        if certificate.is_expired_at(Utc::now()) {
            output::warning(&format!(
                "Certificate '{}' expired on {}",
                certificate.subject(),
                end.format("%Y-%m-%d")
            ));
        } else {
            output::detail(&format!("Valid until: {}", end.format("%Y-%m-%d")));
        }
    }
}
