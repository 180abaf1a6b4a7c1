//! Pinway CLI binary.
//!
//! This binary provides command-line access to pinway's functionality:
//! - Resolve CIDs on the configured gateways and walk the fallback order
//! - Probe gateways for an asset
//! - Pin files, singly or as a video/selfie pair, and unpin them
//! - Flatten legacy media records

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands};

    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = cli.load_config()?;

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    if cli.json_logs {
        logging.json = true;
    }

    #[cfg(feature = "observability")]
    let provider = pinway::init_observability(pinway::ObservabilityConfig::new(logging))?;
    #[cfg(not(feature = "observability"))]
    pinway::init_tracing(&logging)?;

    let result = match cli.command {
        Commands::Resolve {
            cid,
            path,
            index,
            all,
        } => cli::resolve(&config, &cid, path.as_deref(), index, all),
        Commands::Next { url, attempt } => cli::next(&config, &url, attempt),
        Commands::Probe {
            cid,
            path,
            timeout_ms,
        } => cli::probe(&config, &cid, path.as_deref(), timeout_ms).await,
        Commands::Upload {
            file,
            owner,
            kind,
            mime,
            max_retries,
        } => cli::upload(&config, &file, &owner, kind, mime, max_retries).await,
        Commands::UploadPair {
            video,
            selfie,
            owner,
        } => cli::upload_pair(&config, &video, &selfie, &owner).await,
        Commands::Unpin { cid } => cli::unpin(&config, &cid).await,
        Commands::Normalize { input } => cli::normalize_record(input.as_deref()),
        Commands::Config => cli::show_config(&config),
    };

    #[cfg(feature = "observability")]
    pinway::shutdown_observability(provider);

    result?;
    Ok(())
}
