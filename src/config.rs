use log::debug;

pub const DEFAULT_API_URL: &str = "https://blockchain.info";
pub const API_URL_ENV: &str = "BLOCKCHAIN_API_URL";
pub const OUTPUT_FILE: &str = "transactions.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: String,
    pub output_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: DEFAULT_API_URL.to_string(),
            output_path: OUTPUT_FILE.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::with_api_url(std::env::var(API_URL_ENV).ok())
    }

    /// Blank overrides fall back to the public explorer.
    fn with_api_url(api_url: Option<String>) -> Self {
        let mut config = Config::default();
        if let Some(url) = api_url.map(|url| url.trim().to_string()).filter(|url| !url.is_empty()) {
            debug!("Using explorer API at {}", url);
            config.api_base_url = url;
        }
        config
    }
}
