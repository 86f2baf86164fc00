//! Social escrow command-line client.
//!
//! # Usage
//!
//! ```bash
//! # Sign an attestation (chain ID from the RPC node)
//! social-escrow attest --platform-id 1 --user-id 987654321 \
//!     --payout-address 0x1111111111111111111111111111111111111111 --deposit-id 1
//!
//! # Check a signature offline
//! social-escrow --chain-id 8453 verify --platform-id 1 --user-id 987654321 \
//!     --payout-address 0x1111111111111111111111111111111111111111 --deposit-id 1 \
//!     --nonce 42 --expiry 1724000000 --signature 0x...
//!
//! # Configure logging level
//! RUST_LOG=info social-escrow get-deposit --deposit-id 1
//! ```
//!
//! # Environment Variables
//!
//! Settings are read from the environment and a `.env` file; flags win.
//!
//! - `RPC_URL`, `ESCROW_ADDRESS`, `CHAIN_ID`
//! - `DEPOSITOR_PRIVATE_KEY`, `RELAYER_PRIVATE_KEY`, `ATTESTER_PRIVATE_KEY`
//! - `RUST_LOG` - Log level filter (default: `warn`)

#![allow(clippy::print_stdout, clippy::print_stderr)]

use clap::Parser;
use tracing_subscriber::EnvFilter;

use social_escrow_cli::cli::{self, Cli};
use social_escrow_cli::commands::{Dispatcher, RpcConnector};
use social_escrow_cli::config::EscrowConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Missing .env is fine
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.print() {
                Ok(()) => cli::exit_code(&e),
                Err(_) => 1,
            };
            std::process::exit(code);
        }
    };

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = EscrowConfig::from_args(cli.global)?;
    tracing::debug!(?config, "Loaded configuration");

    let report = Dispatcher::new(&config, RpcConnector)
        .dispatch(cli.command)
        .await?;
    println!("{}", report.render(config.json())?.trim_end());
    Ok(())
}
