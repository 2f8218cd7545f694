mod adapters;
mod cli;
mod config;
mod core;

use cli::Commands;

fn main() {
    let args = cli::parse();
    cli::context::init(args.verbose, args.quiet);

    let config = args.config.as_deref();

    let result = match &args.command {
        Commands::Encrypt { cert, input } => cli::commands::encrypt::execute(cert, input, config),
        Commands::Decrypt { cert, input } => cli::commands::decrypt::execute(cert, input, config),
    };

    if let Err(e) = result {
        cli::output::error(&format!("Error: {e}"));
        std::process::exit(1);
    }
}
