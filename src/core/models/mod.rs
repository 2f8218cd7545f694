pub mod certificate;
pub mod envelope;
