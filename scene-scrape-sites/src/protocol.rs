use std::io::Read;

use scene_scrape_core::{Mode, SceneRecord, ScrapeInput, SearchStub};

use crate::client::PageClient;
use crate::config::FetchConfig;
use crate::error::ScrapeError;
use crate::site::{self, SiteScraper};

/// Response document printed to stdout. The host treats empty output
/// (`{}` / `[]`) as "not found", never as a hard error; the process always
/// exits 0.
#[derive(Debug)]
pub enum Response {
    Record(Option<SceneRecord>),
    Stubs(Vec<SearchStub>),
}

impl Response {
    /// Serialize into the single compact JSON document the host expects.
    pub fn to_json(&self) -> String {
        match self {
            Response::Record(Some(record)) => {
                serde_json::to_string(record).unwrap_or_else(|_| "{}".to_string())
            }
            Response::Record(None) => "{}".to_string(),
            Response::Stubs(stubs) => {
                serde_json::to_string(stubs).unwrap_or_else(|_| "[]".to_string())
            }
        }
    }
}

/// Run one scraper invocation: read the payload from stdin, dispatch on the
/// mode argument, and return the response document.
pub fn run(site: &dyn SiteScraper, arg: Option<&str>) -> Response {
    let mut raw_input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut raw_input) {
        log::warn!("Failed to read stdin: {}", e);
    }
    run_with_input(site, arg, &raw_input)
}

/// Dispatch on the mode argument given an already-read stdin payload.
fn run_with_input(site: &dyn SiteScraper, arg: Option<&str>, raw_input: &str) -> Response {
    let input = if raw_input.trim().is_empty() {
        Some(ScrapeInput::default())
    } else {
        match serde_json::from_str::<ScrapeInput>(&raw_input) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                log::warn!("Malformed stdin JSON ({}), falling back to CLI mode", e);
                None
            }
        }
    };

    match input {
        Some(input) => match arg.and_then(Mode::parse) {
            Some(mode) => {
                log::info!("Mode: {}", mode);
                log::debug!("Input: {}", truncate(&raw_input, 500));
                dispatch(site, mode, &input)
            }
            None => match arg {
                Some(free_form) => run_cli(site, free_form),
                None => {
                    log::info!("Usage: <mode>");
                    log::info!("Modes: {}", Mode::ALL.join(", "));
                    Response::Record(None)
                }
            },
        },
        // Malformed stdin: treat argv as free-form test input even when it
        // happens to spell a mode name.
        None => match arg {
            Some(free_form) => run_cli(site, free_form),
            None => Response::Record(None),
        },
    }
}

/// Select the response shape for a recognized mode.
fn dispatch(site: &dyn SiteScraper, mode: Mode, input: &ScrapeInput) -> Response {
    match mode {
        Mode::SceneByUrl => match input.url.as_deref() {
            Some(url) => Response::Record(log_failure(scrape_url(site, url))),
            None => {
                log::warn!("No URL in input");
                Response::Record(None)
            }
        },

        Mode::SceneByFragment => match site::resolve_code(site, input) {
            Some(code) => {
                log::info!("Extracted code: {}", code);
                Response::Record(log_failure(scrape_fragment(site, &code)))
            }
            None => {
                log::warn!("No code found in fragment data");
                Response::Record(None)
            }
        },

        Mode::SceneByName => {
            let query = input.name.as_deref().unwrap_or("");
            if query.is_empty() {
                log::warn!("No search query");
                return Response::Stubs(Vec::new());
            }
            Response::Stubs(stub_list(log_failure(scrape_fragment(site, query))))
        }

        Mode::SceneByQueryFragment => {
            let code = site::resolve_code(site, input);
            if code.is_none() {
                log::warn!("No code found in query fragment");
            }
            let scene = code.and_then(|c| log_failure(scrape_fragment(site, &c)));
            if site.query_fragment_returns_list() {
                Response::Stubs(stub_list(scene))
            } else {
                Response::Record(scene)
            }
        }
    }
}

/// Free-form CLI test mode: the argument is a URL or a fragment.
fn run_cli(site: &dyn SiteScraper, arg: &str) -> Response {
    let result = if arg.starts_with("http") {
        scrape_url(site, arg)
    } else {
        scrape_fragment(site, arg)
    };
    Response::Record(log_failure(result))
}

/// Resolve a fragment to the site's detail URL and scrape it.
fn scrape_fragment(site: &dyn SiteScraper, fragment: &str) -> Result<SceneRecord, ScrapeError> {
    let code = site.clean_fragment(fragment).ok_or(ScrapeError::NoInput)?;
    scrape_url(site, &site.detail_url(&code))
}

/// Fetch one detail page and extract the record.
fn scrape_url(site: &dyn SiteScraper, url: &str) -> Result<SceneRecord, ScrapeError> {
    log::info!("Scraping: {}", url);
    let client = PageClient::new(site.transport(), &FetchConfig::load())?;
    let html = client.fetch_page(url, site.charset())?;
    site.extract(&html, url)
}

fn stub_list(scene: Option<SceneRecord>) -> Vec<SearchStub> {
    scene.map(|s| vec![s.to_stub()]).unwrap_or_default()
}

/// Collapse any stage failure to the absent sentinel, logging the cause.
fn log_failure(result: Result<SceneRecord, ScrapeError>) -> Option<SceneRecord> {
    match result {
        Ok(record) => Some(record),
        Err(e) => {
            log::warn!("{}", e);
            None
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
