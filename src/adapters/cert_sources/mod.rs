pub mod pem_file_source;
