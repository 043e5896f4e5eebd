pub mod client;
pub mod collect;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::SerpApiClient;
pub use collect::{collect_trending_now, TrendsCollectOutcome};
pub use error::{CollectError, TrendsError};
pub use normalize::{normalize_trending_item, normalize_trending_items};
pub use types::{TrendingNowMeta, TrendingNowParams, TrendingNowResponse};
