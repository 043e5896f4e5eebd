//! Database operations for the `trending_keywords` table.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use sqlx::PgPool;
use trendfeed_core::NormalizedKeyword;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `trending_keywords` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TrendingKeywordRow {
    pub id: i64,
    pub collected_at: DateTime<Utc>,
    pub geo: Option<String>,
    pub hl: Option<String>,
    pub hours: Option<i32>,
    pub title: String,
    pub link: Option<String>,
    pub categories: Option<String>,
    pub search_volume: Option<i32>,
    pub increase_percentage: Option<i32>,
    pub active: Option<bool>,
    pub start_time: Option<DateTime<Utc>>,
    pub trends_link: Option<String>,
    pub news_page_token: Option<String>,
    pub news_link: Option<String>,
    pub raw_json: Option<Value>,
}

/// Request-level metadata stamped onto every row of one collection cycle.
#[derive(Debug, Clone)]
pub struct CollectionContext {
    pub geo: String,
    pub hl: String,
    pub hours: i32,
    pub collected_at: DateTime<Utc>,
}

/// Filter applied by [`select_top_keyword`].
#[derive(Debug, Clone, Copy)]
pub struct SelectionCriteria {
    /// Only rows collected within this many hours of `now` qualify.
    pub window_hours: i64,
    /// Rows below this search volume (or with no volume at all) are ignored.
    pub min_search_volume: i32,
}

impl Default for SelectionCriteria {
    fn default() -> Self {
        Self {
            window_hours: 4,
            min_search_volume: 500,
        }
    }
}

const KEYWORD_COLUMNS: &str = "id, collected_at, geo, hl, hours, title, link, categories, \
     search_volume, increase_percentage, active, start_time, trends_link, \
     news_page_token, news_link, raw_json";

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Bulk-insert one collection cycle of normalized keywords.
///
/// Rows without a non-blank title are skipped. All inserts share one
/// transaction, so a failure leaves no partial batch behind. Returns the
/// number of rows written.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any insert fails.
pub async fn insert_trending_keywords(
    pool: &PgPool,
    ctx: &CollectionContext,
    rows: &[NormalizedKeyword],
) -> Result<u64, DbError> {
    let insertable: Vec<(&str, &NormalizedKeyword)> = rows
        .iter()
        .filter_map(|row| row.insertable_title().map(|title| (title, row)))
        .collect();

    if insertable.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let mut written = 0_u64;

    for (title, row) in insertable {
        let result = sqlx::query(
            "INSERT INTO trending_keywords ( \
                 collected_at, geo, hl, hours, title, link, categories, \
                 search_volume, increase_percentage, active, start_time, \
                 trends_link, news_page_token, news_link, raw_json) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
        )
        .bind(ctx.collected_at)
        .bind(&ctx.geo)
        .bind(&ctx.hl)
        .bind(ctx.hours)
        .bind(title)
        .bind(row.link.as_deref())
        .bind(row.categories.as_deref())
        .bind(row.search_volume)
        .bind(row.increase_percentage)
        .bind(row.active)
        .bind(row.start_time)
        .bind(row.trends_link.as_deref())
        .bind(row.news_page_token.as_deref())
        .bind(row.news_link.as_deref())
        .bind(&row.raw)
        .execute(&mut *tx)
        .await?;
        written += result.rows_affected();
    }

    tx.commit().await?;

    tracing::debug!(written, submitted = rows.len(), "inserted trending keywords");
    Ok(written)
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Return the single best trending keyword collected recently.
///
/// Candidates must fall inside the criteria window relative to `now` and meet
/// the search-volume threshold; rows with an unknown volume never qualify.
/// When `category` is given, the stored pipe-joined set must contain that
/// exact token (case-insensitive), so `IT` matches `IT|과학` but not `ITEM`.
///
/// Ordering: `search_volume DESC`, `increase_percentage DESC NULLS LAST`,
/// `collected_at DESC`, then `id DESC` so identical inputs always resolve to
/// the same row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn select_top_keyword(
    pool: &PgPool,
    category: Option<&str>,
    criteria: SelectionCriteria,
    now: DateTime<Utc>,
) -> Result<Option<TrendingKeywordRow>, DbError> {
    let since = now - Duration::hours(criteria.window_hours);

    let row = sqlx::query_as::<_, TrendingKeywordRow>(&format!(
        "SELECT {KEYWORD_COLUMNS} \
         FROM trending_keywords \
         WHERE collected_at >= $1 \
           AND search_volume IS NOT NULL \
           AND search_volume >= $2 \
           AND ($3::text IS NULL OR EXISTS ( \
                 SELECT 1 FROM unnest(string_to_array(categories, '|')) AS c(token) \
                 WHERE lower(btrim(c.token)) = lower($3))) \
         ORDER BY search_volume DESC NULLS LAST, \
                  increase_percentage DESC NULLS LAST, \
                  collected_at DESC, \
                  id DESC \
         LIMIT 1"
    ))
    .bind(since)
    .bind(criteria.min_search_volume)
    .bind(category)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
