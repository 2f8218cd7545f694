pub mod certificate_source;
pub mod cipher;
