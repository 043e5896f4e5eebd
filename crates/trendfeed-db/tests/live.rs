//! Live integration tests for trendfeed-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/trendfeed-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use trendfeed_core::{NormalizedKeyword, RankingNewsItem};
use trendfeed_db::{
    insert_trending_keywords, list_recent_ranking_titles, save_ranking_news, select_top_keyword,
    CollectionContext, SelectionCriteria,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn keyword(
    title: Option<&str>,
    categories: Option<&str>,
    search_volume: Option<i32>,
    increase_percentage: Option<i32>,
) -> NormalizedKeyword {
    NormalizedKeyword {
        title: title.map(ToOwned::to_owned),
        link: None,
        categories: categories.map(ToOwned::to_owned),
        search_volume,
        increase_percentage,
        active: Some(true),
        start_time: None,
        trends_link: None,
        news_page_token: None,
        news_link: None,
        raw: json!({ "query": title }),
    }
}

fn ctx(collected_at: DateTime<Utc>) -> CollectionContext {
    CollectionContext {
        geo: "KR".to_string(),
        hl: "ko".to_string(),
        hours: 4,
        collected_at,
    }
}

fn ranking_item(title: &str, press: &str, rank: i32) -> RankingNewsItem {
    RankingNewsItem {
        press: press.to_string(),
        category: None,
        rank,
        title: title.to_string(),
        link: format!("https://n.news.naver.com/article/001/{rank}"),
    }
}

async fn count_rows(pool: &sqlx::PgPool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("count rows")
}

// ---------------------------------------------------------------------------
// trending_keywords
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn insert_skips_rows_without_title(pool: sqlx::PgPool) {
    let rows = vec![
        keyword(Some("환율"), None, Some(1000), None),
        keyword(None, None, Some(2000), None),
        keyword(Some("   "), None, Some(3000), None),
        keyword(Some("날씨"), None, None, None),
    ];

    let written = insert_trending_keywords(&pool, &ctx(Utc::now()), &rows)
        .await
        .expect("insert");

    assert_eq!(written, 2);
    assert_eq!(count_rows(&pool, "trending_keywords").await, 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn insert_of_only_blank_titles_writes_nothing(pool: sqlx::PgPool) {
    let rows = vec![keyword(None, None, Some(10), None)];
    let written = insert_trending_keywords(&pool, &ctx(Utc::now()), &rows)
        .await
        .expect("insert");
    assert_eq!(written, 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn category_filter_matches_whole_tokens_only(pool: sqlx::PgPool) {
    let now = Utc::now();
    insert_trending_keywords(
        &pool,
        &ctx(now),
        &[keyword(Some("item shop"), Some("ITEM"), Some(5000), None)],
    )
    .await
    .expect("insert");

    let none = select_top_keyword(&pool, Some("IT"), SelectionCriteria::default(), now)
        .await
        .expect("select");
    assert!(none.is_none(), "IT must not match ITEM");

    insert_trending_keywords(
        &pool,
        &ctx(now),
        &[keyword(Some("반도체"), Some("IT|과학"), Some(600), None)],
    )
    .await
    .expect("insert");

    let hit = select_top_keyword(&pool, Some("IT"), SelectionCriteria::default(), now)
        .await
        .expect("select")
        .expect("row");
    assert_eq!(hit.title, "반도체");
}

#[sqlx::test(migrations = "../../migrations")]
async fn category_filter_is_case_insensitive_for_latin_and_exact_for_hangul(pool: sqlx::PgPool) {
    let now = Utc::now();
    insert_trending_keywords(
        &pool,
        &ctx(now),
        &[keyword(Some("반도체"), Some("IT|과학"), Some(600), None)],
    )
    .await
    .expect("insert");

    let latin = select_top_keyword(&pool, Some("it"), SelectionCriteria::default(), now)
        .await
        .expect("select");
    assert!(latin.is_some());

    let hangul = select_top_keyword(&pool, Some("과학"), SelectionCriteria::default(), now)
        .await
        .expect("select");
    assert!(hangul.is_some());

    let partial = select_top_keyword(&pool, Some("과"), SelectionCriteria::default(), now)
        .await
        .expect("select");
    assert!(partial.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn higher_increase_wins_on_equal_volume(pool: sqlx::PgPool) {
    let now = Utc::now();
    let rows = vec![
        keyword(Some("no-increase"), None, Some(1000), None),
        keyword(Some("low"), None, Some(1000), Some(200)),
        keyword(Some("high"), None, Some(1000), Some(500)),
    ];
    insert_trending_keywords(&pool, &ctx(now), &rows)
        .await
        .expect("insert");

    let top = select_top_keyword(&pool, None, SelectionCriteria::default(), now)
        .await
        .expect("select")
        .expect("row");
    assert_eq!(top.title, "high");
}

#[sqlx::test(migrations = "../../migrations")]
async fn most_recent_wins_on_equal_volume_and_increase(pool: sqlx::PgPool) {
    let now = Utc::now();
    insert_trending_keywords(
        &pool,
        &ctx(now - Duration::hours(2)),
        &[keyword(Some("older"), None, Some(1000), Some(100))],
    )
    .await
    .expect("insert");
    insert_trending_keywords(
        &pool,
        &ctx(now - Duration::hours(1)),
        &[keyword(Some("newer"), None, Some(1000), Some(100))],
    )
    .await
    .expect("insert");

    let top = select_top_keyword(&pool, None, SelectionCriteria::default(), now)
        .await
        .expect("select")
        .expect("row");
    assert_eq!(top.title, "newer");
}

#[sqlx::test(migrations = "../../migrations")]
async fn volume_dominates_other_keys(pool: sqlx::PgPool) {
    let now = Utc::now();
    insert_trending_keywords(
        &pool,
        &ctx(now - Duration::hours(3)),
        &[keyword(Some("big"), None, Some(20_000), Some(10))],
    )
    .await
    .expect("insert");
    insert_trending_keywords(
        &pool,
        &ctx(now),
        &[keyword(Some("small"), None, Some(1_000), Some(9_000))],
    )
    .await
    .expect("insert");

    let top = select_top_keyword(&pool, None, SelectionCriteria::default(), now)
        .await
        .expect("select")
        .expect("row");
    assert_eq!(top.title, "big");
}

#[sqlx::test(migrations = "../../migrations")]
async fn stale_low_and_unknown_volume_rows_are_excluded(pool: sqlx::PgPool) {
    let now = Utc::now();
    insert_trending_keywords(
        &pool,
        &ctx(now - Duration::hours(5)),
        &[keyword(Some("stale"), None, Some(50_000), None)],
    )
    .await
    .expect("insert");
    insert_trending_keywords(
        &pool,
        &ctx(now),
        &[
            keyword(Some("low"), None, Some(499), None),
            keyword(Some("unknown"), None, None, Some(10_000)),
        ],
    )
    .await
    .expect("insert");

    let top = select_top_keyword(&pool, None, SelectionCriteria::default(), now)
        .await
        .expect("select");
    assert!(top.is_none());

    insert_trending_keywords(
        &pool,
        &ctx(now),
        &[keyword(Some("threshold"), None, Some(500), None)],
    )
    .await
    .expect("insert");
    let top = select_top_keyword(&pool, None, SelectionCriteria::default(), now)
        .await
        .expect("select")
        .expect("row");
    assert_eq!(top.title, "threshold");
}

// ---------------------------------------------------------------------------
// naver_ranking_news
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn duplicate_title_across_cycles_is_stored_once(pool: sqlx::PgPool) {
    let now = Utc::now();
    let first = save_ranking_news(&pool, &[ranking_item("같은 제목", "연합뉴스", 1)], now)
        .await
        .expect("first save");
    assert_eq!(first.inserted, 1);

    let second = save_ranking_news(
        &pool,
        &[ranking_item("같은 제목", "KBS", 3)],
        now + Duration::hours(6),
    )
    .await
    .expect("second save");
    assert_eq!(second.inserted, 0);

    assert_eq!(count_rows(&pool, "naver_ranking_news").await, 1);
    let press: String =
        sqlx::query_scalar("SELECT press FROM naver_ranking_news WHERE title = '같은 제목'")
            .fetch_one(&pool)
            .await
            .expect("press");
    assert_eq!(press, "연합뉴스");
}

#[sqlx::test(migrations = "../../migrations")]
async fn retention_sweep_runs_even_without_new_items(pool: sqlx::PgPool) {
    let now = Utc::now();
    save_ranking_news(
        &pool,
        &[ranking_item("오래된 기사", "MBC", 2)],
        now - Duration::days(4),
    )
    .await
    .expect("seed old row");
    save_ranking_news(
        &pool,
        &[ranking_item("어제 기사", "SBS", 1)],
        now - Duration::days(1),
    )
    .await
    .expect("seed recent row");

    let outcome = save_ranking_news(&pool, &[], now).await.expect("sweep");
    assert_eq!(outcome.pruned, 1);
    assert_eq!(outcome.inserted, 0);

    let titles: Vec<String> = sqlx::query_scalar("SELECT title FROM naver_ranking_news")
        .fetch_all(&pool)
        .await
        .expect("titles");
    assert_eq!(titles, vec!["어제 기사".to_string()]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn expired_title_can_be_inserted_again(pool: sqlx::PgPool) {
    let now = Utc::now();
    save_ranking_news(
        &pool,
        &[ranking_item("돌아온 기사", "MBC", 5)],
        now - Duration::days(4),
    )
    .await
    .expect("seed old row");

    let outcome = save_ranking_news(&pool, &[ranking_item("돌아온 기사", "JTBC", 1)], now)
        .await
        .expect("save");
    assert_eq!(outcome.pruned, 1);
    assert_eq!(outcome.inserted, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn recent_titles_filter_by_category_halves(pool: sqlx::PgPool) {
    let now = Utc::now();
    let mut it = ranking_item("AI 칩 경쟁", "전자신문", 1);
    it.category = Some("IT/과학".to_string());
    let mut politics = ranking_item("국회 본회의", "한겨레", 2);
    politics.category = Some("정치".to_string());
    let uncategorized = ranking_item("미분류 기사", "뉴스1", 3);

    save_ranking_news(&pool, &[it, politics, uncategorized], now)
        .await
        .expect("save");

    let since = now - Duration::hours(24);
    let all = list_recent_ranking_titles(&pool, since, &[])
        .await
        .expect("all");
    assert_eq!(all.len(), 3);

    let it_only = list_recent_ranking_titles(&pool, since, &["IT".to_string()])
        .await
        .expect("it");
    assert_eq!(it_only, vec!["AI 칩 경쟁".to_string()]);

    let mut mixed = list_recent_ranking_titles(
        &pool,
        since,
        &["정치".to_string(), "과학".to_string()],
    )
    .await
    .expect("mixed");
    mixed.sort();
    assert_eq!(mixed, vec!["AI 칩 경쟁".to_string(), "국회 본회의".to_string()]);
}
