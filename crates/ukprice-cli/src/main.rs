use clap::{Parser, Subcommand};

mod output;
mod report;
mod scrape;

#[derive(Debug, Parser)]
#[command(name = "ukprice")]
#[command(about = "UK cigar market price tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search every configured source, match listings, and write price files.
    Scrape,
    /// Print the latest reconciled prices.
    Report,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ukprice_core::load_app_config_from_env()?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Scrape => scrape::run(&config).await,
        Commands::Report => report::run(&config),
    }
}
