use adapter_router::cli::commands::{adapters, balances, quote, swap};
use adapter_router::cli::{Cli, Commands};
use adapter_router::core::{Config, SwapError};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), SwapError> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Load configuration
    dotenv::dotenv().ok();
    let config = Config::from_env()?;
    config.validate()?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Execute command
    match cli.command {
        Commands::Quote(args) => quote::execute(args, config).await?,
        Commands::Swap(args) => swap::execute(args, config).await?,
        Commands::Adapters(args) => adapters::execute(args, config).await?,
        Commands::Balances(args) => balances::execute(args, config).await?,
    }

    Ok(())
}
