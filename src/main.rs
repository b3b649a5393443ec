mod classify;
mod cli;
mod db;
mod decode;
mod error;
mod fingerprint;
mod importer;
mod models;
mod parser;
mod settings;
#[cfg(test)]
mod testutil;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{AccountsCommands, Cli, Commands};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init {
            data_dir,
            credit_account,
        } => cli::init::run(data_dir, credit_account),
        Commands::Accounts { command } => match command {
            AccountsCommands::Add { name, account_type } => cli::accounts::add(&name, &account_type),
            AccountsCommands::List => cli::accounts::list(),
        },
        Commands::Import { file, source } => cli::import::run(&file, source.as_deref()),
        Commands::Imports => cli::imports::run(),
        Commands::Lookup { iban, bic } => cli::lookup::run(&iban, &bic),
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
