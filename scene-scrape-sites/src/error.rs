/// Errors that can occur while resolving, fetching, or extracting a scene.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Page structure changed: {0}")]
    PageStructure(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No usable code or URL in input")]
    NoInput,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
