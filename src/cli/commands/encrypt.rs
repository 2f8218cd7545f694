use crate::adapters::cipher::envelope_backend::EnvelopeBackend;
use crate::cli::commands::{crypto_helpers, input};
use crate::cli::output;
use crate::cli::{CertArgs, InputArgs};
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::services::encryption_service::EncryptionService;
use crate::core::traits::cipher::CipherBackend;

/// Execute the `certcrypt encrypt` command.
///
/// Encrypts the input for the certificate's public key and prints the
/// envelope text to stdout.
pub fn execute(cert: &CertArgs, input: &InputArgs, config_path: Option<&str>) -> Result<()> {
    output::header("certcrypt encrypt");
    let plaintext = input::resolve(input)?;
    let config = AppConfig::load(config_path)?;
    let certificate = crypto_helpers::load_certificate(cert, &config)?;

    let service = EncryptionService::new(EnvelopeBackend::new());
    output::detail(&format!(
        "Encrypting {} bytes with {}",
        plaintext.len(),
        service.cipher.name()
    ));

    let ciphertext = service.encrypt_text(&plaintext, &certificate)?;
    output::success(&format!("Encrypted for {}", certificate.subject()));

    println!("{ciphertext}");
    Ok(())
}
