//! Fetch the current trending searches and persist them as one cycle.

use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;
use trendfeed_db::{insert_trending_keywords, CollectionContext};

use crate::client::SerpApiClient;
use crate::error::CollectError;
use crate::normalize::normalize_trending_items;
use crate::types::{TrendingNowMeta, TrendingNowParams};

/// Result of [`collect_trending_now`].
#[derive(Debug, Clone, Serialize)]
pub struct TrendsCollectOutcome {
    /// Rows written; untitled items are not counted.
    pub stored: u64,
    pub meta: TrendingNowMeta,
}

/// Fetch, normalize, and bulk-insert one trending-now cycle.
///
/// Every row of the cycle is stamped with the same `collected_at` and the
/// request's `geo`/`hl`/`hours`. `params` is clamped before use.
///
/// # Errors
///
/// Returns [`CollectError::Fetch`] if the provider call fails and
/// [`CollectError::Db`] if the insert transaction fails.
pub async fn collect_trending_now(
    client: &SerpApiClient,
    pool: &PgPool,
    params: TrendingNowParams,
) -> Result<TrendsCollectOutcome, CollectError> {
    let params = params.clamped();
    let response = client.fetch_trending_now(&params).await?;
    let rows = normalize_trending_items(&response.items);

    let ctx = CollectionContext {
        geo: params.geo.clone(),
        hl: params.hl.clone(),
        hours: params.hours,
        collected_at: Utc::now(),
    };
    let stored = insert_trending_keywords(pool, &ctx, &rows).await?;

    tracing::info!(
        geo = %params.geo,
        fetched = response.items.len(),
        stored,
        "trending-now collection finished"
    );

    Ok(TrendsCollectOutcome {
        stored,
        meta: response.meta,
    })
}
