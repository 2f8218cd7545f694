pub mod cert_sources;
pub mod cipher;
