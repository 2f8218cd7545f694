use std::path::PathBuf;

/// All domain errors for certcrypt.
///
/// Each cryptographic failure kind has its own variant so the shell can
/// tell the operator exactly what went wrong. Nothing is coalesced into
/// a generic error.
#[derive(Debug, thiserror::Error)]
pub enum CertCryptError {
    #[error(
        "Invalid certificate: {reason}\n\n  \
         certcrypt needs an X.509 certificate with an RSA public key of at least 2048 bits.\n  \
         Accepted formats: PEM (optionally bundled with its private key) or DER."
    )]
    InvalidCertificate { reason: String },

    #[error(
        "Private key unavailable: {reason}\n\n  \
         Decryption needs the certificate's private key.\n\n  \
         Solutions:\n    \
         → Use a PEM bundle that contains the private key\n    \
         → Point to the key file: --key <path>\n    \
         → Encrypted key? Pass the password: --password <pw> or CERTCRYPT_PASSWORD"
    )]
    PrivateKeyUnavailable { reason: String },

    #[error(
        "Malformed input: {reason}\n\n  \
         The text is not a certcrypt envelope. Pass the exact output of 'certcrypt encrypt'."
    )]
    MalformedInput { reason: String },

    #[error(
        "Authentication failed: the ciphertext was modified or corrupted\n\n  \
         No plaintext was produced. Re-encrypt the original value."
    )]
    AuthenticationFailure,

    #[error(
        "Key unwrap failed: this ciphertext was not encrypted for the given certificate\n\n  \
         Envelope key id: {envelope_key_id}\n  \
         Certificate key id: {certificate_key_id}\n\n  \
         Decrypt with the certificate that was used to encrypt."
    )]
    KeyUnwrapFailure {
        envelope_key_id: String,
        certificate_key_id: String,
    },

    #[error("Encoding failed: {reason}")]
    EncodingFailure { reason: String },

    #[error("{detail}")]
    ArgumentError { detail: String },

    #[error(
        "File not found: {path}\n\n  \
         Check that the path is correct and the file exists."
    )]
    FileNotFound { path: PathBuf },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CertCryptError>;
