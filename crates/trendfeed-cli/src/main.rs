mod collect;
mod select;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::collect::CollectCommands;

#[derive(Debug, Parser)]
#[command(name = "trendfeed-cli")]
#[command(about = "trendfeed command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Run one collection cycle
    Collect {
        #[command(subcommand)]
        command: CollectCommands,
    },
    /// Print the keyword the trends feed would be built from
    Select {
        /// Single category token (e.g. IT)
        #[arg(long)]
        category: Option<String>,
        /// Look-back window in hours
        #[arg(long, default_value = "4")]
        window_hours: i64,
        /// Minimum search volume
        #[arg(long, default_value = "500")]
        min_volume: i32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("trendfeed-cli: no command given; see --help");
        return Ok(());
    };

    let config = trendfeed_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = trendfeed_db::PoolConfig::from_app_config(&config);
    let pool = trendfeed_db::connect_pool(&config.database_url, pool_config).await?;

    let result = match command {
        Commands::Migrate => {
            let applied = trendfeed_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
            Ok(())
        }
        Commands::Collect { command } => collect::run(&pool, &config, command).await,
        Commands::Select {
            category,
            window_hours,
            min_volume,
        } => {
            let criteria = trendfeed_db::SelectionCriteria {
                window_hours,
                min_search_volume: min_volume,
            };
            select::run_select(&pool, category.as_deref(), criteria).await
        }
    };

    pool.close().await;
    result
}
