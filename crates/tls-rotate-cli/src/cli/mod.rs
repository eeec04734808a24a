//! CLI argument parsing, logging setup and dispatch.

pub mod args;

use anyhow::Result;
use args::Cli;
use clap::Parser;
use tls_rotate_ca::OsEntropy;
use tls_rotate_client::KubeSecretStore;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::rotate::rotate;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let store = KubeSecretStore::in_cluster(&cli.namespace)
        .map_err(|e| anyhow::anyhow!("unable to make config for kubernetes client: {e}"))?;

    match rotate(&store, &cli.secret_name, &mut OsEntropy).await {
        Ok(info) => {
            info!(
                secret = %cli.secret_name,
                namespace = %cli.namespace,
                serial = %info.serial,
                not_after = %info.not_after,
                "updated cert secret with domain {}",
                info.subject
            );
            Ok(())
        }
        Err(e) => {
            error!(stage = e.stage(), secret = %cli.secret_name, "{e}");
            Err(e.into())
        }
    }
}

/// Install the global fmt subscriber. `RUST_LOG` takes precedence over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
