use std::path::PathBuf;

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
pub struct AppConfig {
    pub env: Environment,
    /// Backend origin, without a trailing slash, e.g. `http://localhost:8000`.
    pub api_base_url: String,
    pub log_level: String,
    /// File the session token is persisted to between CLI invocations.
    pub session_path: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Storefront listing page size, validated to `1..=MAX_PAGE_SIZE`.
    pub page_size: u32,
    /// Digits-only WhatsApp number used for order links.
    pub whatsapp_number: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("api_base_url", &self.api_base_url)
            .field("log_level", &self.log_level)
            .field("session_path", &self.session_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("page_size", &self.page_size)
            .field(
                "whatsapp_number",
                &self.whatsapp_number.as_ref().map(|_| "[set]"),
            )
            .finish()
    }
}
