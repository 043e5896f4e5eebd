//! Text-generation flows backed by an OpenAI-compatible chat-completions API.
//!
//! Three flows share one [`ChatClient`]:
//!
//! - [`generate_longform`]: one keyword in, one long article out. Failures
//!   propagate to the caller.
//! - [`generate_items_from_records`]: many trending records in, short feed
//!   items out. Never fails; falls back to deterministic items.
//! - [`categorize_titles`]: news titles in, closed-set category labels out.
//!   Never fails; unclassifiable titles get [`trendfeed_core::UNCATEGORIZED`].

pub mod batch;
pub mod classify;
pub mod client;
pub mod error;
pub mod json;
pub mod longform;
pub mod prompts;

pub use batch::{fallback_items, generate_items_from_records, KeywordRecord};
pub use classify::{categorize_titles, CLASSIFY_BATCH_SIZE};
pub use client::{ChatClient, ChatConfig, ChatRequest};
pub use error::{FailureKind, FailurePolicy, Flow, LlmError};
pub use longform::{generate_longform, AudienceProfile, LengthPolicy, LongFormRequest};
