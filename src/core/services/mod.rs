pub mod encryption_service;
