//! Database operations for the `naver_ranking_news` table.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use sqlx::PgPool;
use trendfeed_core::RankingNewsItem;

use crate::DbError;

/// Rows older than this are swept before every insert batch.
pub const RANKING_RETENTION_DAYS: i64 = 3;

/// A row from the `naver_ranking_news` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RankingNewsRow {
    pub id: i64,
    pub collected_at: DateTime<Utc>,
    pub press: String,
    pub category: Option<String>,
    pub rank: i32,
    pub title: String,
    pub link: String,
    pub raw_json: Option<Value>,
}

/// Counts reported by [`save_ranking_news`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RankingSaveOutcome {
    pub pruned: u64,
    pub inserted: u64,
}

/// Persist one collection cycle of ranking items.
///
/// Inside a single transaction this first deletes every row collected more
/// than [`RANKING_RETENTION_DAYS`] before `now` (even when `items` is empty),
/// then inserts each item with `ON CONFLICT (title) DO NOTHING`. A title that
/// is already stored keeps its original press/rank until it ages out.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the sweep or any insert fails; the transaction
/// is rolled back in that case.
pub async fn save_ranking_news(
    pool: &PgPool,
    items: &[RankingNewsItem],
    now: DateTime<Utc>,
) -> Result<RankingSaveOutcome, DbError> {
    let cutoff = now - Duration::days(RANKING_RETENTION_DAYS);
    let mut tx = pool.begin().await?;

    let pruned = sqlx::query("DELETE FROM naver_ranking_news WHERE collected_at < $1")
        .bind(cutoff)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let mut inserted = 0_u64;
    for item in items {
        let raw = serde_json::json!({
            "press": item.press,
            "category": item.category,
            "rank": item.rank,
            "title": item.title,
            "link": item.link,
        });

        inserted += sqlx::query(
            "INSERT INTO naver_ranking_news \
                 (collected_at, press, category, rank, title, link, raw_json) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (title) DO NOTHING",
        )
        .bind(now)
        .bind(&item.press)
        .bind(item.category.as_deref())
        .bind(item.rank)
        .bind(&item.title)
        .bind(&item.link)
        .bind(raw)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    tx.commit().await?;

    tracing::info!(
        pruned,
        inserted,
        submitted = items.len(),
        "saved ranking news batch"
    );
    Ok(RankingSaveOutcome { pruned, inserted })
}

/// List titles of ranking rows collected at or after `since`.
///
/// When `categories` is non-empty only rows whose category matches one of the
/// requested labels are returned. Stored section names such as `IT/과학` are
/// split on `/`, so either half matches.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_ranking_titles(
    pool: &PgPool,
    since: DateTime<Utc>,
    categories: &[String],
) -> Result<Vec<String>, DbError> {
    let titles = if categories.is_empty() {
        sqlx::query_scalar::<_, String>(
            "SELECT title FROM naver_ranking_news \
             WHERE collected_at >= $1 \
             ORDER BY collected_at DESC, id DESC",
        )
        .bind(since)
        .fetch_all(pool)
        .await?
    } else {
        sqlx::query_scalar::<_, String>(
            "SELECT title FROM naver_ranking_news \
             WHERE collected_at >= $1 \
               AND category IS NOT NULL \
               AND (category = ANY($2) OR EXISTS ( \
                     SELECT 1 FROM unnest(string_to_array(category, '/')) AS c(part) \
                     WHERE c.part = ANY($2))) \
             ORDER BY collected_at DESC, id DESC",
        )
        .bind(since)
        .bind(categories)
        .fetch_all(pool)
        .await?
    };

    Ok(titles)
}
