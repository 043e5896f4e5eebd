use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
#[allow(clippy::struct_field_names)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub api_key_hash_salt: Option<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub llm_connect_timeout_secs: u64,
    pub llm_timeout_secs: u64,
    pub serpapi_api_key: Option<String>,
    pub http_connect_timeout_secs: u64,
    pub http_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub rss_title: String,
    pub rss_link: String,
    pub rss_description: String,
    /// Target character count handed to the long-form prompt when the caller
    /// does not supply one.
    pub longform_target_len: u32,
    /// Absolute minimum length; the prompt floor is `max(this, 80% of target)`.
    pub longform_min_floor: u32,
    pub feed_max_items: usize,
    pub trends_cron: Option<String>,
    pub ranking_cron: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field(
                "api_key_hash_salt",
                &self.api_key_hash_salt.as_ref().map(|_| "[redacted]"),
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("openai_model", &self.openai_model)
            .field("openai_base_url", &self.openai_base_url)
            .field("llm_connect_timeout_secs", &self.llm_connect_timeout_secs)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field(
                "serpapi_api_key",
                &self.serpapi_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("http_connect_timeout_secs", &self.http_connect_timeout_secs)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field("rss_title", &self.rss_title)
            .field("rss_link", &self.rss_link)
            .field("rss_description", &self.rss_description)
            .field("longform_target_len", &self.longform_target_len)
            .field("longform_min_floor", &self.longform_min_floor)
            .field("feed_max_items", &self.feed_max_items)
            .field("trends_cron", &self.trends_cron)
            .field("ranking_cron", &self.ranking_cron)
            .finish()
    }
}
