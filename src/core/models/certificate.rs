use chrono::{DateTime, Utc};
use rsa::pkcs8::EncodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};

use crate::core::errors::{CertCryptError, Result};

/// Smallest RSA modulus accepted for encryption.
pub const MIN_RSA_BITS: usize = 2048;

/// SHA-256 of a public key's SubjectPublicKeyInfo DER.
///
/// Identifies the key pair independently of the certificate wrapping it,
/// so a re-issued certificate for the same key keeps the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyId(pub [u8; 32]);

impl KeyId {
    /// Compute the id of an RSA public key.
    pub fn of(public_key: &RsaPublicKey) -> Result<Self> {
        let der = public_key
            .to_public_key_der()
            .map_err(|e| CertCryptError::InvalidCertificate {
                reason: format!("Cannot encode public key: {e}"),
            })?;
        let mut hasher = Sha256::new();
        hasher.update(der.as_bytes());
        let mut id = [0u8; 32];
        id.copy_from_slice(&hasher.finalize());
        Ok(Self(id))
    }
}

impl std::fmt::Display for KeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// What a loaded certificate lets us do.
pub enum KeyMaterial {
    /// Public and private key are both accessible.
    KeyPair(RsaPrivateKey),
    /// Only the public key is accessible.
    ///
    /// `private_key_note` records why the private half is missing when
    /// the loader saw one but could not open it (e.g. wrong password).
    PublicOnly {
        public_key: RsaPublicKey,
        private_key_note: Option<String>,
    },
    /// The certificate carries a key certcrypt cannot use (EC, DSA, ...).
    Unsupported { algorithm: String },
}

/// A certificate as seen by the cipher engine: a capability set over
/// its key material plus a few descriptive fields for diagnostics.
///
/// Loaded by a `CertificateSource`, borrowed read-only by the engine.
pub struct Certificate {
    subject: String,
    not_after: Option<DateTime<Utc>>,
    keys: KeyMaterial,
}

impl Certificate {
    pub fn new(subject: impl Into<String>, keys: KeyMaterial) -> Self {
        Self {
            subject: subject.into(),
            not_after: None,
            keys,
        }
    }

    /// Certificate holding a full key pair.
    pub fn from_key_pair(subject: impl Into<String>, private_key: RsaPrivateKey) -> Self {
        Self::new(subject, KeyMaterial::KeyPair(private_key))
    }

    /// Certificate holding only a public key.
    pub fn public_only(subject: impl Into<String>, public_key: RsaPublicKey) -> Self {
        Self::new(
            subject,
            KeyMaterial::PublicOnly {
                public_key,
                private_key_note: None,
            },
        )
    }

    pub fn with_not_after(mut self, not_after: DateTime<Utc>) -> Self {
        self.not_after = Some(not_after);
        self
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn not_after(&self) -> Option<DateTime<Utc>> {
        self.not_after
    }

    pub fn keys(&self) -> &KeyMaterial {
        &self.keys
    }

    /// True when the validity period ended before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.not_after.is_some_and(|end| end < now)
    }

    pub fn has_private_key(&self) -> bool {
        matches!(self.keys, KeyMaterial::KeyPair(_))
    }

    /// The RSA public key usable for encryption.
    ///
    /// Fails with `InvalidCertificate` for non-RSA keys and for moduli
    /// below `MIN_RSA_BITS`.
    pub fn public_key(&self) -> Result<&RsaPublicKey> {
        let key = match &self.keys {
            KeyMaterial::KeyPair(private_key) => AsRef::<RsaPublicKey>::as_ref(private_key),
            KeyMaterial::PublicOnly { public_key, .. } => public_key,
            KeyMaterial::Unsupported { algorithm } => {
                return Err(CertCryptError::InvalidCertificate {
                    reason: format!(
                        "'{}' has an unsupported {algorithm} key; only RSA keys are supported",
                        self.subject
                    ),
                });
            }
        };

        let bits = key.size() * 8;
        if bits < MIN_RSA_BITS {
            return Err(CertCryptError::InvalidCertificate {
                reason: format!(
                    "'{}' has a {bits}-bit RSA key; at least {MIN_RSA_BITS} bits are required",
                    self.subject
                ),
            });
        }

        Ok(key)
    }

    /// The RSA private key usable for decryption.
    pub fn private_key(&self) -> Result<&RsaPrivateKey> {
        match &self.keys {
            KeyMaterial::KeyPair(private_key) => Ok(private_key),
            KeyMaterial::PublicOnly {
                private_key_note: Some(note),
                ..
            } => Err(CertCryptError::PrivateKeyUnavailable {
                reason: note.clone(),
            }),
            KeyMaterial::PublicOnly { .. } => Err(CertCryptError::PrivateKeyUnavailable {
                reason: format!("'{}' was loaded without a private key", self.subject),
            }),
            KeyMaterial::Unsupported { algorithm } => {
                Err(CertCryptError::PrivateKeyUnavailable {
                    reason: format!("'{}' has an unsupported {algorithm} key", self.subject),
                })
            }
        }
    }

    /// Key id of the certificate's public key.
    pub fn key_id(&self) -> Result<KeyId> {
        KeyId::of(self.public_key()?)
    }
}

impl std::fmt::Debug for Certificate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.keys {
            KeyMaterial::KeyPair(_) => "key pair",
            KeyMaterial::PublicOnly { .. } => "public only",
            KeyMaterial::Unsupported { .. } => "unsupported",
        };
        f.debug_struct("Certificate")
            .field("subject", &self.subject)
            .field("not_after", &self.not_after)
            .field("keys", &kind)
            .finish()
    }
}
