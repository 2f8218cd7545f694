use crate::adapters::cipher::envelope_backend::EnvelopeBackend;
use crate::cli::commands::{crypto_helpers, input};
use crate::cli::{CertArgs, InputArgs, context, output};
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::models::envelope::Envelope;
use crate::core::services::encryption_service::EncryptionService;

/// Execute the `certcrypt decrypt` command.
///
/// Opens an envelope produced by `certcrypt encrypt` and prints the
/// original text to stdout.
pub fn execute(cert: &CertArgs, input: &InputArgs, config_path: Option<&str>) -> Result<()> {
    output::header("certcrypt decrypt");
    let ciphertext = input::resolve(input)?;
    let config = AppConfig::load(config_path)?;
    let certificate = crypto_helpers::load_certificate(cert, &config)?;

    if context::is_verbose() {
        if let Ok(envelope) = Envelope::from_text(&ciphertext) {
            output::detail(&format!("Envelope algorithm: {}", envelope.algorithm));
            output::detail(&format!("Envelope key id: {}", envelope.key_id));
        }
    }

    let service = EncryptionService::new(EnvelopeBackend::new());
    let plaintext = service.decrypt_text(&ciphertext, &certificate)?;
    output::success(&format!("Decrypted with {}", certificate.subject()));

    println!("{plaintext}");
    Ok(())
}
