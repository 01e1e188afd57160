//! agentci — CI orchestrator for cloud agent deployments.

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use agentci::cli::Cli;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            if matches!(error.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                let _ = error.print();
                return;
            }
            // single fatal exit code for the CI contract, not clap's 2
            tracing::error!(error = %error, "invalid invocation");
            std::process::exit(1);
        }
    };

    if let Err(error) = cli.run().await {
        tracing::error!(error = format!("{error:#}"), "operation failed");
        std::process::exit(1);
    }
}
