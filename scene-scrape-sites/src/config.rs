use std::path::PathBuf;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fetch settings shared by all scrapers.
///
/// Priority: env vars > config file > defaults. Every knob has a default,
/// so loading never fails.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Override for the browser user agent.
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

/// TOML config file format.
#[derive(Debug, serde::Deserialize)]
struct ConfigFile {
    fetch: Option<FetchSection>,
}

#[derive(Debug, serde::Deserialize)]
struct FetchSection {
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
}

impl FetchConfig {
    /// Load settings from environment variables and the config file.
    pub fn load() -> Self {
        let file = load_config_file();

        let timeout_secs = std::env::var("SCENE_SCRAPE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .or_else(|| file.as_ref().and_then(|f| f.timeout_secs))
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let user_agent = std::env::var("SCENE_SCRAPE_USER_AGENT")
            .ok()
            .or_else(|| file.as_ref().and_then(|f| f.user_agent.clone()));

        Self {
            timeout_secs,
            user_agent,
        }
    }
}

/// Return the path to the config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("scene-scrape").join("config.toml"))
}

fn load_config_file() -> Option<FetchSection> {
    let path = config_path()?;
    let content = std::fs::read_to_string(&path).ok()?;
    let config: ConfigFile = toml::from_str(&content).ok()?;
    config.fetch
}
