use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};
use chrono::{Duration, Utc};
use rand::seq::IndexedRandom;
use serde::Deserialize;
use sqlx::PgPool;
use trendfeed_core::{validate_category_filter, GeneratedItems};
use trendfeed_db::{select_top_keyword, SelectionCriteria, TrendingKeywordRow};
use trendfeed_llm::{
    generate_items_from_records, generate_longform, AudienceProfile, KeywordRecord,
    LongFormRequest,
};
use trendfeed_rss::{build_feed, FeedInput, RSS_CONTENT_TYPE};

use super::{map_db_error, map_feed_error, map_llm_error, ApiError, AppState};
use crate::middleware::RequestId;

/// Seed used when no keyword is given and no recent ranking title exists.
const DEFAULT_SEED_KEYWORD: &str = "오늘의 주요 뉴스";
const SEED_LOOKBACK_HOURS: i64 = 24;

#[derive(Debug, Deserialize)]
pub(super) struct TrendsFeedQuery {
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct GenerateQuery {
    pub keyword: Option<String>,
    /// Pipe-delimited ranking categories used to pick a seed title.
    pub category: Option<String>,
    pub ages: Option<u32>,
    pub region: Option<String>,
    pub gender: Option<String>,
    pub tone: Option<String>,
    pub length: Option<u32>,
}

pub(super) async fn feed_from_trends(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<TrendsFeedQuery>,
) -> Result<Response, ApiError> {
    let category = match validate_category_filter(params.category.as_deref()) {
        Ok(category) => category,
        Err(e) => {
            tracing::info!(error = %e, "rss/trends: rejected category filter");
            return Ok(StatusCode::NO_CONTENT.into_response());
        }
    };

    let row = select_top_keyword(
        &state.pool,
        category.as_deref(),
        SelectionCriteria::default(),
        Utc::now(),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let Some(row) = row else {
        tracing::info!(category = ?category, "rss/trends: no qualifying keyword");
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let records = [keyword_record(&row)];
    let items =
        generate_items_from_records(&state.chat, &records, state.generation.feed_max_items).await;
    let xml = build_feed(&[FeedInput::from(items)], &state.channel)
        .map_err(|e| map_feed_error(req_id.0.clone(), &e))?;

    Ok(rss_response(xml))
}

pub(super) async fn generate_longform_feed(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<GenerateQuery>,
) -> Result<Response, ApiError> {
    let keyword = match non_blank(params.keyword.as_deref()) {
        Some(keyword) => keyword.to_string(),
        None => seed_keyword(&state.pool, params.category.as_deref()).await,
    };

    let defaults = AudienceProfile::default();
    let request = LongFormRequest {
        keyword,
        audience: AudienceProfile {
            ages: params.ages.unwrap_or(defaults.ages),
            region: non_blank(params.region.as_deref()).map_or(defaults.region, str::to_string),
            gender: non_blank(params.gender.as_deref()).map_or(defaults.gender, str::to_string),
            tone: non_blank(params.tone.as_deref()).map_or(defaults.tone, str::to_string),
            target_len: params
                .length
                .filter(|len| *len > 0)
                .unwrap_or(state.generation.longform_target_len),
        },
        length: state.generation.length,
    };

    let items = generate_longform(&state.chat, &request)
        .await
        .map_err(|e| map_llm_error(req_id.0.clone(), &e))?;
    let xml = build_feed(&[FeedInput::from(GeneratedItems { items })], &state.channel)
        .map_err(|e| map_feed_error(req_id.0.clone(), &e))?;

    Ok(rss_response(xml))
}

/// Pick a random ranking title from the last day, restricted to the
/// pipe-delimited `categories` when given.
async fn seed_keyword(pool: &PgPool, categories: Option<&str>) -> String {
    let categories: Vec<String> = categories
        .unwrap_or_default()
        .split('|')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    let since = Utc::now() - Duration::hours(SEED_LOOKBACK_HOURS);

    let titles = match trendfeed_db::list_recent_ranking_titles(pool, since, &categories).await {
        Ok(titles) => titles,
        Err(e) => {
            tracing::warn!(error = %e, "rss/generate: ranking title lookup failed");
            Vec::new()
        }
    };

    let picked = titles.choose(&mut rand::rng()).cloned();
    picked.unwrap_or_else(|| DEFAULT_SEED_KEYWORD.to_string())
}

pub(super) fn keyword_record(row: &TrendingKeywordRow) -> KeywordRecord {
    KeywordRecord {
        title: row.title.clone(),
        categories: row.categories.clone(),
        search_volume: row.search_volume,
        increase_percentage: row.increase_percentage,
        link: row.link.clone(),
        news_link: row.news_link.clone(),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn rss_response(xml: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, RSS_CONTENT_TYPE)], xml).into_response()
}
