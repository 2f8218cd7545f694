use crate::core::errors::{CertCryptError, Result};
use crate::core::models::certificate::Certificate;
use crate::core::models::envelope::{decode_text, encode_text};
use crate::core::traits::cipher::CipherBackend;

/// Text-in, text-out encryption against a single certificate.
///
/// Stateless: the certificate is borrowed per call and never stored.
pub struct EncryptionService<C: CipherBackend> {
    pub cipher: C,
}

impl<C: CipherBackend> EncryptionService<C> {
    pub fn new(cipher: C) -> Self {
        Self { cipher }
    }

    /// Encrypt `plaintext` for the certificate's public key.
    ///
    /// Output is printable and differs on every call.
    pub fn encrypt_text(&self, plaintext: &str, certificate: &Certificate) -> Result<String> {
        let envelope = self.cipher.encrypt(plaintext.as_bytes(), certificate)?;
        Ok(encode_text(&envelope))
    }

    /// Recover the plaintext of an `encrypt_text` result.
    pub fn decrypt_text(&self, ciphertext: &str, certificate: &Certificate) -> Result<String> {
        certificate.private_key()?;

        let envelope = decode_text(ciphertext)?;
        let plaintext = self.cipher.decrypt(&envelope, certificate)?;

        String::from_utf8(plaintext).map_err(|_| CertCryptError::EncodingFailure {
            reason: "Decrypted payload is not valid UTF-8 text".into(),
        })
    }
}
