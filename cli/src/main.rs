mod commands;

use anyhow::Result;
use clap::Parser;
use shared_types::Owner;
use tracing::{info, Level};
use userprefs::preferences::{PreferenceConfig, PreferenceResource};

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr, stdout is reserved for JSON output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = PreferenceConfig::from_env()?;
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    info!("Using {} preference backend", config.backend);

    let resource = PreferenceResource::from_config(config)?;
    let owner = Owner::new(cli.owner);

    commands::run(&resource, &owner, cli.command).await
}
