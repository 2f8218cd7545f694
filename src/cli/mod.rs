pub mod commands;
pub mod context;
pub mod output;

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};

/// Encrypt and decrypt text with an X.509 certificate.
#[derive(Parser, Debug)]
#[command(name = "certcrypt", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to alternative config file
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encrypt text for a certificate's public key
    Encrypt {
        #[command(flatten)]
        cert: CertArgs,
        #[command(flatten)]
        input: InputArgs,
    },

    /// Decrypt text with a certificate's private key
    Decrypt {
        #[command(flatten)]
        cert: CertArgs,
        #[command(flatten)]
        input: InputArgs,
    },
}

/// Where the certificate and its private key come from.
#[derive(Args, Debug)]
pub struct CertArgs {
    /// Certificate file: PEM (optionally bundled with its private key) or DER
    #[arg(short, long, env = "CERTCRYPT_CERT")]
    pub cert: Option<String>,

    /// Separate PEM private key file
    #[arg(short, long, env = "CERTCRYPT_KEY")]
    pub key: Option<String>,

    /// Password for an encrypted private key
    #[arg(short, long, env = "CERTCRYPT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// The text to process. Exactly one of the two must be given.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Text to encrypt or decrypt
    #[arg(short, long)]
    pub text: Option<String>,

    /// Read the text from this file
    #[arg(short, long)]
    pub file: Option<String>,
}

/// Parse the command line, exiting with status 1 on any parse error
/// and when help is requested.
pub fn parse() -> Cli {
    Cli::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        let code = match e.kind() {
            ErrorKind::DisplayVersion => 0,
            _ => 1,
        };
        std::process::exit(code);
    })
}
