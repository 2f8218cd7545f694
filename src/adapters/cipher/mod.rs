pub mod envelope_backend;
