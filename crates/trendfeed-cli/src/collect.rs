//! Collection command handlers for the CLI.
//!
//! These are called from `main` after the database pool and config are
//! established. Each command runs exactly one cycle and exits.

use clap::Subcommand;
use trendfeed_core::AppConfig;
use trendfeed_llm::{ChatClient, ChatConfig};
use trendfeed_ranking::RankingClient;
use trendfeed_trends::{SerpApiClient, TrendingNowParams};

/// Sub-commands available under `collect`.
#[derive(Debug, Subcommand)]
pub enum CollectCommands {
    /// Fetch trending searches and store them
    Trends {
        /// Region code
        #[arg(long, default_value = "KR")]
        geo: String,
        /// Interface language
        #[arg(long, default_value = "ko")]
        hl: String,
        /// Look-back window in hours (clamped to 1..=24)
        #[arg(long, default_value = "4")]
        hours: i32,
        /// Provider category id
        #[arg(long)]
        category_id: Option<i64>,
        /// Bypass the provider cache
        #[arg(long)]
        no_cache: bool,
    },
    /// Scrape the news ranking page and store unique titles
    Ranking,
}

pub(crate) async fn run(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    command: CollectCommands,
) -> anyhow::Result<()> {
    match command {
        CollectCommands::Trends {
            geo,
            hl,
            hours,
            category_id,
            no_cache,
        } => {
            let params = TrendingNowParams {
                geo,
                hl,
                hours,
                category_id,
                no_cache,
            };
            run_collect_trends(pool, config, params).await
        }
        CollectCommands::Ranking => run_collect_ranking(pool, config).await,
    }
}

/// Fetch one trending-now batch and insert it.
///
/// # Errors
///
/// Returns an error if the client cannot be built, no API key is configured,
/// the provider call fails, or the insert transaction fails.
pub(crate) async fn run_collect_trends(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    params: TrendingNowParams,
) -> anyhow::Result<()> {
    let client = SerpApiClient::new(
        config.serpapi_api_key.as_deref(),
        config.http_connect_timeout_secs,
        config.http_timeout_secs,
    )
    .map_err(|e| anyhow::anyhow!("failed to build SerpApi client: {e}"))?;

    let outcome = trendfeed_trends::collect_trending_now(&client, pool, params).await?;
    if let Some(error) = outcome.meta.error.as_deref() {
        tracing::warn!(error, "provider reported an error");
    }
    println!(
        "stored {} of {} trending item(s) for geo={}",
        outcome.stored, outcome.meta.count, outcome.meta.geo
    );
    Ok(())
}

/// Scrape the ranking page once, classifying uncategorized titles when a
/// generation provider is configured.
///
/// # Errors
///
/// Returns an error if a client cannot be built, the page fetch fails, or
/// the sweep/insert transaction fails.
pub(crate) async fn run_collect_ranking(
    pool: &sqlx::PgPool,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let client = RankingClient::new(
        &config.scraper_user_agent,
        config.http_connect_timeout_secs,
        config.http_timeout_secs,
    )?;
    let classifier = ChatClient::new(&ChatConfig::from_app_config(config))?;

    let items = trendfeed_ranking::collect_ranking(&client, pool, Some(&classifier)).await?;
    println!("collected {} ranking item(s)", items.len());
    for item in &items {
        println!(
            "  [{}] #{} {} ({})",
            item.press,
            item.rank,
            item.title,
            item.category.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}
