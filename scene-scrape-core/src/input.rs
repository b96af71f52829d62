use serde::Deserialize;

/// Invocation mode selector, passed by the host as the first CLI argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    SceneByUrl,
    SceneByFragment,
    SceneByName,
    SceneByQueryFragment,
}

impl Mode {
    /// Parse a host mode string. Unrecognized strings map to `None`, which
    /// sends the invocation down the free-form CLI test path.
    pub fn parse(arg: &str) -> Option<Self> {
        match arg {
            "scene-by-url" => Some(Mode::SceneByUrl),
            "scene-by-fragment" => Some(Mode::SceneByFragment),
            "scene-by-name" => Some(Mode::SceneByName),
            "scene-by-query-fragment" => Some(Mode::SceneByQueryFragment),
            _ => None,
        }
    }

    /// All mode strings the host can pass, for usage diagnostics.
    pub const ALL: &'static [&'static str] = &[
        "scene-by-url",
        "scene-by-fragment",
        "scene-by-name",
        "scene-by-query-fragment",
    ];
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::SceneByUrl => write!(f, "scene-by-url"),
            Mode::SceneByFragment => write!(f, "scene-by-fragment"),
            Mode::SceneByName => write!(f, "scene-by-name"),
            Mode::SceneByQueryFragment => write!(f, "scene-by-query-fragment"),
        }
    }
}

/// JSON payload the host writes to stdin. Every field is optional; which
/// ones are present depends on the invocation mode.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScrapeInput {
    /// Explicit site identifier, used verbatim when present.
    pub code: Option<String>,
    pub url: Option<String>,
    pub urls: Vec<String>,
    pub files: Vec<FileEntry>,
    pub title: Option<String>,
    /// Free-text search query (scene-by-name).
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileEntry {
    pub basename: String,
}

impl ScrapeInput {
    /// The `url` field, falling back to the first entry of `urls`.
    pub fn first_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .or_else(|| self.urls.first().map(|u| u.as_str()))
            .filter(|u| !u.is_empty())
    }
}
