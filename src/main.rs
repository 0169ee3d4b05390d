use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use driver_admin::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "driver_admin=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    match cli.command {
        Commands::Init => cli::commands::init().await,
        Commands::Login {
            username,
            password,
            remember_me,
        } => cli::commands::login(config, username, password, remember_me).await,
        Commands::Logout => cli::commands::logout(config).await,
        Commands::Whoami => cli::commands::whoami(config).await,
        Commands::Drivers { action } => cli::commands::drivers(config, action).await,
    }
}
