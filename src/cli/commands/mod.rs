pub mod crypto_helpers;
pub mod decrypt;
pub mod encrypt;
pub mod input;
