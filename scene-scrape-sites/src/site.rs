use scene_scrape_core::{SceneRecord, ScrapeInput};

use crate::client::TransportProfile;
use crate::error::ScrapeError;

/// A site-specific scraper adapter: URL template, identifier patterns, and
/// extraction strategy for one catalog site.
pub trait SiteScraper {
    /// Tag used in diagnostic output, e.g. "AvBase".
    fn tag(&self) -> &'static str;

    /// Transport profile the site requires.
    fn transport(&self) -> TransportProfile;

    /// Charset the site serves its pages in.
    fn charset(&self) -> &'static str;

    /// Build the detail-page URL for a cleaned identifier code.
    fn detail_url(&self, code: &str) -> String;

    /// Extract an identifier from a URL, if the URL belongs to this site.
    fn code_from_url(&self, url: &str) -> Option<String>;

    /// Extract an identifier from a filename stem (extension already
    /// stripped).
    fn code_from_stem(&self, stem: &str) -> Option<String>;

    /// Extract an identifier from a free-text title. Stricter than stems:
    /// never falls back to the raw text.
    fn code_from_title(&self, title: &str) -> Option<String>;

    /// Reduce a free-text fragment to the code used in the detail URL.
    fn clean_fragment(&self, fragment: &str) -> Option<String>;

    /// Project a fetched page into a scene record.
    fn extract(&self, html: &str, url: &str) -> Result<SceneRecord, ScrapeError>;

    /// Whether scene-by-query-fragment responds with a stub array instead
    /// of a single record. The shape is part of each site's host contract:
    /// AvBase installs consume an array here, DLGetchu installs an object.
    fn query_fragment_returns_list(&self) -> bool;
}

/// Derive an identifier code from the stdin payload, trying each field in
/// the fixed priority order: explicit code, URL, filename stems, title.
pub fn resolve_code(site: &dyn SiteScraper, input: &ScrapeInput) -> Option<String> {
    if let Some(code) = &input.code {
        if !code.is_empty() {
            return Some(code.clone());
        }
    }

    if let Some(url) = input.first_url() {
        if let Some(code) = site.code_from_url(url) {
            log::debug!("Code {} from URL {}", code, url);
            return Some(code);
        }
    }

    for file in &input.files {
        let stem = strip_extension(&file.basename);
        if let Some(code) = site.code_from_stem(stem) {
            log::debug!("Code {} from file {}", code, file.basename);
            return Some(code);
        }
    }

    if let Some(title) = &input.title {
        if let Some(code) = site.code_from_title(title) {
            log::debug!("Code {} from title", code);
            return Some(code);
        }
    }

    None
}

/// Drop the trailing `.ext` from a filename, if any. A dotfile like
/// `.hidden` is all extension, leaving an empty stem that no site accepts.
fn strip_extension(basename: &str) -> &str {
    match basename.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => basename,
    }
}
