//! Naver "most viewed by press" ranking collector.

pub mod client;
pub mod collect;
pub mod error;
pub mod parse;

pub use client::{RankingClient, NAVER_RANKING_URL};
pub use collect::{collect_ranking, dedup_by_title, fill_missing_categories};
pub use error::{CollectError, RankingError};
pub use parse::{category_from_link, parse_ranking_html, SECTION_CATEGORIES};
