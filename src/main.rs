use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mediflow::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mediflow=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => cli::commands::init().await,
        Commands::Login {
            email,
            role,
            password,
        } => cli::commands::login(&email, role, password).await,
        Commands::Logout => cli::commands::logout().await,
        Commands::Whoami { format } => cli::commands::whoami(format).await,
        Commands::Nav => cli::commands::nav().await,
        Commands::Open { path } => cli::commands::open(&path).await,
        Commands::Register {
            email,
            role,
            password,
        } => cli::commands::register(&email, role, password).await,
        Commands::ServeAuth { host, port } => cli::commands::serve_auth(host, port).await,
    }
}
