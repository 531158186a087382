use std::io;
use std::sync::Arc;

use anyhow::Context;
use bytestream::cli::{Cli, Commands};
use bytestream::client::localfs::LocalFsClient;
use bytestream::commands::{self, CatOptions};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log);

    let client = Arc::new(LocalFsClient::new(&cli.root));
    match cli.command {
        Commands::Cat {
            path,
            offset,
            length,
            chunk,
        } => {
            let opts = CatOptions {
                offset,
                length,
                chunk_size: chunk,
            };
            let mut stdout = io::stdout().lock();
            commands::cat(client, &path, &opts, &mut stdout)?;
        }
        Commands::Stat { path } => {
            let report = commands::stat(client, &path)?;
            let json = serde_json::to_string_pretty(&report).context("failed to encode stat")?;
            println!("{json}");
        }
        Commands::Status { rows } => {
            print!("{}", commands::status(&rows)?);
        }
    }
    Ok(())
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|e| {
        eprintln!("WARNING: invalid log filter `{filter}` ({e}). Use default value: `info`");
        EnvFilter::new("info")
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
