use base64::{Engine, engine::general_purpose::STANDARD};

use crate::core::errors::{CertCryptError, Result};
use crate::core::models::certificate::KeyId;

/// First bytes of every envelope.
pub const MAGIC: &[u8; 4] = b"CCRT";

/// Envelope layout version written by this build.
pub const FORMAT_VERSION: u8 = 1;

/// AES-GCM nonce size in bytes (96 bits).
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag size in bytes.
pub const TAG_LEN: usize = 16;

/// Key wrap + payload cipher pair recorded in the envelope header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// RSA-OAEP (SHA-256, MGF1-SHA-256) wrapping a 256-bit AES-GCM key.
    RsaOaepSha256Aes256Gcm,
}

impl Algorithm {
    pub fn id(self) -> u8 {
        match self {
            Self::RsaOaepSha256Aes256Gcm => 1,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Self::RsaOaepSha256Aes256Gcm),
            _ => None,
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RsaOaepSha256Aes256Gcm => write!(f, "RSA-OAEP-SHA256 + AES-256-GCM"),
        }
    }
}

/// A hybrid-encrypted payload for a single certificate.
///
/// Binary layout (all integers big-endian):
///
/// ```text
/// magic "CCRT" | version u8 | algorithm u8 | key id [32]
/// | wrapped key length u16 | wrapped key | nonce [12] | ciphertext || tag
/// ```
///
/// Everything before the ciphertext is the header; it is bound to the
/// payload as AES-GCM associated data. The text form is standard base64
/// of the binary layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub algorithm: Algorithm,
    pub key_id: KeyId,
    pub wrapped_key: Vec<u8>,
    pub nonce: [u8; NONCE_LEN],
    /// AES-GCM output: ciphertext followed by the tag.
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Serialized header, used both for framing and as associated data.
    pub fn header_bytes(&self) -> Result<Vec<u8>> {
        let wrapped_len =
            u16::try_from(self.wrapped_key.len()).map_err(|_| CertCryptError::EncodingFailure {
                reason: format!(
                    "Wrapped key is {} bytes, more than an envelope can hold",
                    self.wrapped_key.len()
                ),
            })?;

        let mut header =
            Vec::with_capacity(MAGIC.len() + 2 + 32 + 2 + self.wrapped_key.len() + NONCE_LEN);
        header.extend_from_slice(MAGIC);
        header.push(FORMAT_VERSION);
        header.push(self.algorithm.id());
        header.extend_from_slice(&self.key_id.0);
        header.extend_from_slice(&wrapped_len.to_be_bytes());
        header.extend_from_slice(&self.wrapped_key);
        header.extend_from_slice(&self.nonce);
        Ok(header)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = self.header_bytes()?;
        bytes.extend_from_slice(&self.ciphertext);
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut rest = bytes;

        if take(&mut rest, MAGIC.len(), "magic")? != MAGIC {
            return Err(malformed("missing certcrypt envelope marker"));
        }

        let version = take(&mut rest, 1, "version")?[0];
        if version != FORMAT_VERSION {
            return Err(malformed(&format!(
                "unsupported envelope version {version} (this build reads version {FORMAT_VERSION})"
            )));
        }

        let algorithm_id = take(&mut rest, 1, "algorithm")?[0];
        let algorithm = Algorithm::from_id(algorithm_id)
            .ok_or_else(|| malformed(&format!("unknown algorithm id {algorithm_id}")))?;

        let mut key_id = [0u8; 32];
        key_id.copy_from_slice(take(&mut rest, 32, "key id")?);

        let len_bytes = take(&mut rest, 2, "wrapped key length")?;
        let wrapped_len = usize::from(u16::from_be_bytes([len_bytes[0], len_bytes[1]]));
        if wrapped_len == 0 {
            return Err(malformed("wrapped key is empty"));
        }
        let wrapped_key = take(&mut rest, wrapped_len, "wrapped key")?.to_vec();

        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(take(&mut rest, NONCE_LEN, "nonce")?);

        if rest.len() < TAG_LEN {
            return Err(malformed("ciphertext is shorter than the authentication tag"));
        }

        Ok(Self {
            algorithm,
            key_id: KeyId(key_id),
            wrapped_key,
            nonce,
            ciphertext: rest.to_vec(),
        })
    }

    pub fn from_text(text: &str) -> Result<Self> {
        Self::from_bytes(&decode_text(text)?)
    }
}

/// Encode envelope bytes as one line of standard base64.
pub fn encode_text(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode the printable form back to envelope bytes.
/// ASCII whitespace anywhere is ignored.
pub fn decode_text(text: &str) -> Result<Vec<u8>> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err(malformed("input is empty"));
    }

    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| malformed(&format!("not valid base64: {e}")))
}

fn malformed(reason: &str) -> CertCryptError {
    CertCryptError::MalformedInput {
        reason: reason.to_string(),
    }
}

/// Split `n` bytes off the front of `rest`.
fn take<'a>(rest: &mut &'a [u8], n: usize, field: &str) -> Result<&'a [u8]> {
    let (head, tail) = rest
        .split_at_checked(n)
        .ok_or_else(|| malformed(&format!("truncated before end of {field}")))?;
    *rest = tail;
    Ok(head)
}
