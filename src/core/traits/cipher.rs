use crate::core::errors::Result;
use crate::core::models::certificate::Certificate;

/// Port for certificate-based encryption backends.
///
/// Implementations live in `adapters::cipher` (e.g. EnvelopeBackend).
/// The core layer only depends on this trait, never on a concrete backend.
pub trait CipherBackend: Send + Sync {
    /// Encrypt plaintext for the certificate's public key, returning a
    /// self-contained envelope.
    fn encrypt(&self, plaintext: &[u8], certificate: &Certificate) -> Result<Vec<u8>>;

    /// Open an envelope with the certificate's private key.
    fn decrypt(&self, envelope: &[u8], certificate: &Certificate) -> Result<Vec<u8>>;

    /// Human-readable name of this backend.
    fn name(&self) -> &str;
}
