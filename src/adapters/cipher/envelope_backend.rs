use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use rsa::Oaep;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::core::errors::{CertCryptError, Result};
use crate::core::models::certificate::{Certificate, KeyId};
use crate::core::models::envelope::{Algorithm, Envelope, NONCE_LEN};
use crate::core::traits::cipher::CipherBackend;

/// AES-256 key size in bytes.
const CONTENT_KEY_LEN: usize = 32;

/// Hybrid backend: a fresh AES-256-GCM key per call encrypts the payload,
/// and RSA-OAEP with SHA-256 wraps that key for the certificate.
///
/// Output is the binary `Envelope` layout; the envelope header is bound
/// to the payload as associated data.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvelopeBackend;

impl EnvelopeBackend {
    pub fn new() -> Self {
        Self
    }

    fn payload_cipher(content_key: &[u8]) -> Result<Aes256Gcm> {
        Aes256Gcm::new_from_slice(content_key).map_err(|e| CertCryptError::EncodingFailure {
            reason: format!("Failed to create cipher: {e}"),
        })
    }

    /// Recover the content key, telling a foreign envelope apart from a
    /// tampered one by comparing key ids.
    fn unwrap_content_key(
        envelope: &Envelope,
        certificate: &Certificate,
    ) -> Result<Zeroizing<Vec<u8>>> {
        let private_key = certificate.private_key()?;
        let certificate_key_id = KeyId::of(&private_key.to_public_key())?;

        match private_key.decrypt_blinded(&mut OsRng, Oaep::new::<Sha256>(), &envelope.wrapped_key)
        {
            Ok(key) if key.len() == CONTENT_KEY_LEN => Ok(Zeroizing::new(key)),
            Ok(_) => Err(CertCryptError::AuthenticationFailure),
            Err(_) if envelope.key_id != certificate_key_id => {
                Err(CertCryptError::KeyUnwrapFailure {
                    envelope_key_id: envelope.key_id.to_string(),
                    certificate_key_id: certificate_key_id.to_string(),
                })
            }
            Err(_) => Err(CertCryptError::AuthenticationFailure),
        }
    }
}

impl CipherBackend for EnvelopeBackend {
    fn encrypt(&self, plaintext: &[u8], certificate: &Certificate) -> Result<Vec<u8>> {
        let public_key = certificate.public_key()?;
        let key_id = KeyId::of(public_key)?;

        let mut content_key = Zeroizing::new([0u8; CONTENT_KEY_LEN]);
        OsRng.fill_bytes(&mut content_key[..]);

        let wrapped_key = public_key
            .encrypt(&mut OsRng, Oaep::new::<Sha256>(), &content_key[..])
            .map_err(|e| CertCryptError::EncodingFailure {
                reason: format!("Key wrap failed: {e}"),
            })?;

        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let mut envelope = Envelope {
            algorithm: Algorithm::RsaOaepSha256Aes256Gcm,
            key_id,
            wrapped_key,
            nonce,
            ciphertext: Vec::new(),
        };
        let aad = envelope.header_bytes()?;

        envelope.ciphertext = Self::payload_cipher(&content_key[..])?
            .encrypt(
                Nonce::from_slice(&nonce),
                Payload {
                    msg: plaintext,
                    aad: &aad,
                },
            )
            .map_err(|e| CertCryptError::EncodingFailure {
                reason: format!("Payload encryption failed: {e}"),
            })?;

        envelope.to_bytes()
    }

    fn decrypt(&self, envelope: &[u8], certificate: &Certificate) -> Result<Vec<u8>> {
        // Key access is a precondition, checked before looking at the input.
        certificate.private_key()?;

        let envelope = Envelope::from_bytes(envelope)?;
        let content_key = Self::unwrap_content_key(&envelope, certificate)?;
        let aad = envelope.header_bytes()?;

        Self::payload_cipher(&content_key)?
            .decrypt(
                Nonce::from_slice(&envelope.nonce),
                Payload {
                    msg: &envelope.ciphertext,
                    aad: &aad,
                },
            )
            .map_err(|_| CertCryptError::AuthenticationFailure)
    }

    fn name(&self) -> &str {
        "rsa-oaep+aes-gcm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::RsaPrivateKey;
    use rsa::pkcs8::DecodePrivateKey;

    const ALICE_KEY: &str = include_str!("../../../tests/fixtures/alice_key.pem");

    fn alice() -> Certificate {
        Certificate::from_key_pair("alice", RsaPrivateKey::from_pkcs8_pem(ALICE_KEY).unwrap())
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let backend = EnvelopeBackend::new();
        let cert = alice();

        let plaintext = b"DATABASE_URL=postgres://localhost/mydb\nAPI_KEY=secret123";
        let envelope = backend.encrypt(plaintext, &cert).unwrap();
        let decrypted = backend.decrypt(&envelope, &cert).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn envelope_records_algorithm_and_key_id() {
        let backend = EnvelopeBackend::new();
        let cert = alice();

        let bytes = backend.encrypt(b"secret", &cert).unwrap();
        let envelope = Envelope::from_bytes(&bytes).unwrap();

        assert_eq!(envelope.algorithm, Algorithm::RsaOaepSha256Aes256Gcm);
        assert_eq!(envelope.key_id, cert.key_id().unwrap());
        assert_eq!(envelope.wrapped_key.len(), 256);
        assert_eq!(envelope.ciphertext.len(), b"secret".len() + 16);
    }

    #[test]
    fn fresh_key_and_nonce_per_call() {
        let backend = EnvelopeBackend::new();
        let cert = alice();

        let first = Envelope::from_bytes(&backend.encrypt(b"same", &cert).unwrap()).unwrap();
        let second = Envelope::from_bytes(&backend.encrypt(b"same", &cert).unwrap()).unwrap();

        assert_ne!(first.nonce, second.nonce);
        assert_ne!(first.wrapped_key, second.wrapped_key);
        assert_ne!(first.ciphertext, second.ciphertext);
    }

    #[test]
    fn tampered_wrapped_key_is_an_authentication_failure() {
        let backend = EnvelopeBackend::new();
        let cert = alice();

        let mut envelope = Envelope::from_bytes(&backend.encrypt(b"secret", &cert).unwrap()).unwrap();
        envelope.wrapped_key[10] ^= 0x01;

        let err = backend
            .decrypt(&envelope.to_bytes().unwrap(), &cert)
            .unwrap_err();
        assert!(matches!(err, CertCryptError::AuthenticationFailure));
    }

    #[test]
    fn tampered_key_id_is_an_authentication_failure() {
        let backend = EnvelopeBackend::new();
        let cert = alice();

        let mut envelope = Envelope::from_bytes(&backend.encrypt(b"secret", &cert).unwrap()).unwrap();
        envelope.key_id.0[0] ^= 0x80;

        let err = backend
            .decrypt(&envelope.to_bytes().unwrap(), &cert)
            .unwrap_err();
        assert!(matches!(err, CertCryptError::AuthenticationFailure));
    }

    #[test]
    fn tampered_nonce_or_tag_is_an_authentication_failure() {
        let backend = EnvelopeBackend::new();
        let cert = alice();
        let original = Envelope::from_bytes(&backend.encrypt(b"secret", &cert).unwrap()).unwrap();

        let mut bad_nonce = original.clone();
        bad_nonce.nonce[0] ^= 0x01;
        let mut bad_tag = original.clone();
        let last = bad_tag.ciphertext.len() - 1;
        bad_tag.ciphertext[last] ^= 0x01;

        for envelope in [bad_nonce, bad_tag] {
            let err = backend
                .decrypt(&envelope.to_bytes().unwrap(), &cert)
                .unwrap_err();
            assert!(matches!(err, CertCryptError::AuthenticationFailure));
        }
    }

    #[test]
    fn decrypt_without_private_key_fails_before_parsing() {
        let backend = EnvelopeBackend::new();
        let public =
            Certificate::public_only("alice", alice().public_key().unwrap().clone());

        let err = backend.decrypt(b"garbage", &public).unwrap_err();
        assert!(matches!(err, CertCryptError::PrivateKeyUnavailable { .. }));
    }

    #[test]
    fn backend_has_correct_name() {
        assert_eq!(EnvelopeBackend::new().name(), "rsa-oaep+aes-gcm");
    }
}
