//! MPFM CLI - command line client for the flow meter monitoring API.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "mpfm-cli",
    version,
    about = "Multiphase flow meter monitoring toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: mpfm_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    env_logger::init();
    if let Ok(path) = dotenv {
        log::debug!("Loaded environment from {}", path.display());
    }
    let cli = Cli::parse();
    mpfm_cmd::run(cli.command).await
}
