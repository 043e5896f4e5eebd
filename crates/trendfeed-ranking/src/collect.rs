//! One ranking collection cycle: fetch, parse, classify, dedup, persist.

use std::collections::HashSet;

use chrono::Utc;
use sqlx::PgPool;
use trendfeed_core::{RankingNewsItem, UNCATEGORIZED};
use trendfeed_db::save_ranking_news;
use trendfeed_llm::{categorize_titles, ChatClient};

use crate::client::RankingClient;
use crate::error::CollectError;
use crate::parse::parse_ranking_html;

/// Run one collection cycle.
///
/// Returns every parsed entry (duplicates included, in page order), even when
/// some titles were already stored and therefore not inserted again. Entries
/// whose link carries no section id are classified with `classifier` when it
/// is configured.
///
/// # Errors
///
/// Returns [`CollectError::Fetch`] if the page cannot be fetched and
/// [`CollectError::Db`] if the sweep or insert fails.
pub async fn collect_ranking(
    client: &RankingClient,
    pool: &PgPool,
    classifier: Option<&ChatClient>,
) -> Result<Vec<RankingNewsItem>, CollectError> {
    let html = client.fetch_html().await?;
    let mut items = parse_ranking_html(&html, client.page_url());

    if let Some(classifier) = classifier.filter(|c| c.is_configured()) {
        fill_missing_categories(classifier, &mut items).await;
    }

    let unique = dedup_by_title(&items);
    let outcome = save_ranking_news(pool, &unique, Utc::now()).await?;

    tracing::info!(
        parsed = items.len(),
        unique = unique.len(),
        inserted = outcome.inserted,
        pruned = outcome.pruned,
        "ranking collection finished"
    );

    Ok(items)
}

/// Classify entries that have no category. A [`UNCATEGORIZED`] answer leaves
/// the category absent.
pub async fn fill_missing_categories(classifier: &ChatClient, items: &mut [RankingNewsItem]) {
    let pending: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.category.is_none())
        .map(|(idx, _)| idx)
        .collect();
    if pending.is_empty() {
        return;
    }

    let titles: Vec<String> = pending.iter().map(|&idx| items[idx].title.clone()).collect();
    let labels = categorize_titles(classifier, &titles).await;

    for (&idx, label) in pending.iter().zip(labels) {
        if label != UNCATEGORIZED {
            items[idx].category = Some(label);
        }
    }
}

/// Keep the first entry for each exact title.
#[must_use]
pub fn dedup_by_title(items: &[RankingNewsItem]) -> Vec<RankingNewsItem> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| seen.insert(item.title.as_str()))
        .cloned()
        .collect()
}
