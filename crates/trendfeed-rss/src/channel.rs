use trendfeed_core::AppConfig;

/// Feed language advertised in every channel.
pub const FEED_LANGUAGE: &str = "ko-KR";

/// Channel-level metadata written once per document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMeta {
    pub title: String,
    pub link: String,
    pub description: String,
    pub language: String,
}

impl ChannelMeta {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            description: description.into(),
            language: FEED_LANGUAGE.to_string(),
        }
    }

    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::new(
            config.rss_title.clone(),
            config.rss_link.clone(),
            config.rss_description.clone(),
        )
    }
}
