use crate::core::errors::Result;
use crate::core::models::certificate::Certificate;

/// Port for materializing a certificate from external storage.
pub trait CertificateSource {
    /// Load the certificate and whatever private key access is available.
    fn load(&self) -> Result<Certificate>;

    /// Where the certificate comes from, for diagnostics.
    fn describe(&self) -> String;
}
