//! RSS 2.0 serialization for generated feed items.

pub mod channel;
pub mod error;
pub mod input;
pub mod writer;

pub use channel::ChannelMeta;
pub use error::FeedError;
pub use input::{FeedArticle, FeedInput};
pub use writer::{build_feed, build_feed_at, build_feed_from_values, RSS_CONTENT_TYPE};
