use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use serde::Deserialize;

use scene_scrape_core::record::{dedupe, non_empty};
use scene_scrape_core::{NamedEntry, SceneRecord};

use crate::client::TransportProfile;
use crate::error::ScrapeError;
use crate::site::SiteScraper;

static NEXT_DATA_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script#__NEXT_DATA__").unwrap());

static WORKS_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"avbase\.net/works/([^/?]+)").unwrap());

// Identifier pattern for filename stems, e.g. "SSIS-001" or "NCY_266".
static STEM_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]{2,}[-_]?\d{3,})").unwrap());

// Titles require the word-bounded form to avoid false positives.
static TITLE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z]{2,}[-_]?\d{3,})\b").unwrap());

static FRAGMENT_JUNK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9:-]").unwrap());

static FC2_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(FC2-PPV-|FC2PPV)").unwrap());

// "Wed Jan 15 2020"-style date served in the work payload.
static TEXT_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)\s+(\w+)\s+(\d+)\s+(\d{4})").unwrap());

const MONTHS: &[(&str, &str)] = &[
    ("Jan", "01"),
    ("Feb", "02"),
    ("Mar", "03"),
    ("Apr", "04"),
    ("May", "05"),
    ("Jun", "06"),
    ("Jul", "07"),
    ("Aug", "08"),
    ("Sep", "09"),
    ("Oct", "10"),
    ("Nov", "11"),
    ("Dec", "12"),
];

/// Typed view of the `__NEXT_DATA__` payload, narrowed to the fields the
/// record needs. Everything else in the blob is ignored.
#[derive(Debug, Deserialize)]
struct NextData {
    props: Props,
}

#[derive(Debug, Deserialize)]
struct Props {
    #[serde(rename = "pageProps")]
    page_props: PageProps,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    #[serde(default)]
    work: Option<Work>,
}

#[derive(Debug, Deserialize)]
struct Work {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    work_id: Option<String>,
    #[serde(default)]
    note: Option<String>,
    #[serde(default)]
    min_date: Option<String>,
    #[serde(default)]
    products: Vec<Product>,
    #[serde(default)]
    casts: Vec<Cast>,
    #[serde(default)]
    genres: Vec<Named>,
}

#[derive(Debug, Deserialize)]
struct Product {
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    maker: Option<Named>,
}

#[derive(Debug, Deserialize)]
struct Cast {
    #[serde(default)]
    actor: Option<Named>,
}

#[derive(Debug, Deserialize)]
struct Named {
    #[serde(default)]
    name: Option<String>,
}

/// Scraper for www.avbase.net work pages (embedded-JSON strategy).
///
/// The site renders through Next.js, so the whole record lives in the
/// `script#__NEXT_DATA__` JSON blob under `props.pageProps.work`. The site
/// sits behind a bot-challenge layer and needs the browser transport.
pub struct AvBase;

impl AvBase {
    fn parse_next_data(html: &str) -> Result<NextData, ScrapeError> {
        let doc = Html::parse_document(html);
        let script = doc
            .select(&NEXT_DATA_SELECTOR)
            .next()
            .ok_or_else(|| ScrapeError::PageStructure("missing __NEXT_DATA__ script".into()))?;
        let json: String = script.text().collect();
        Ok(serde_json::from_str(&json)?)
    }
}

/// Parse a `"Wed Jan 15 2020"`-style string into `YYYY-MM-DD`.
/// Unrecognized month names map to `"01"` rather than failing.
fn parse_text_date(raw: &str) -> Option<String> {
    let caps = TEXT_DATE.captures(raw)?;
    let month = MONTHS
        .iter()
        .find(|(name, _)| *name == &caps[2])
        .map(|(_, num)| *num)
        .unwrap_or("01");
    Some(format!("{}-{}-{:0>2}", &caps[4], month, &caps[3]))
}

impl SiteScraper for AvBase {
    fn tag(&self) -> &'static str {
        "AvBase"
    }

    fn transport(&self) -> TransportProfile {
        TransportProfile::Browser
    }

    fn charset(&self) -> &'static str {
        "utf-8"
    }

    fn detail_url(&self, code: &str) -> String {
        format!("https://www.avbase.net/works/{code}")
    }

    fn code_from_url(&self, url: &str) -> Option<String> {
        WORKS_URL.captures(url).map(|caps| caps[1].to_string())
    }

    fn code_from_stem(&self, stem: &str) -> Option<String> {
        let upper = stem.to_uppercase();
        if let Some(caps) = STEM_CODE.captures(&upper) {
            return Some(caps[1].to_string());
        }
        // No pattern match: use the bare stem as-is.
        if stem.is_empty() {
            None
        } else {
            Some(stem.to_string())
        }
    }

    fn code_from_title(&self, title: &str) -> Option<String> {
        let upper = title.to_uppercase();
        TITLE_CODE.captures(&upper).map(|caps| caps[1].to_string())
    }

    fn clean_fragment(&self, fragment: &str) -> Option<String> {
        let cleaned = FRAGMENT_JUNK.replace_all(fragment, "").to_uppercase();
        let cleaned = FC2_PREFIX.replace(&cleaned, "").into_owned();
        if cleaned.is_empty() { None } else { Some(cleaned) }
    }

    fn extract(&self, html: &str, url: &str) -> Result<SceneRecord, ScrapeError> {
        let next_data = Self::parse_next_data(html)?;
        let work = next_data
            .props
            .page_props
            .work
            .ok_or_else(|| ScrapeError::PageStructure("no work data in page payload".into()))?;

        let primary = work.products.first();

        Ok(SceneRecord {
            title: non_empty(work.title),
            code: non_empty(work.work_id),
            details: non_empty(work.note),
            date: work.min_date.as_deref().and_then(parse_text_date),
            url: Some(url.to_string()),
            image: non_empty(primary.and_then(|p| p.image_url.clone())),
            studio: primary
                .and_then(|p| p.maker.as_ref())
                .and_then(|m| non_empty(m.name.clone()))
                .map(NamedEntry::new),
            performers: work
                .casts
                .iter()
                .filter_map(|c| c.actor.as_ref())
                .filter_map(|a| non_empty(a.name.clone()))
                .map(NamedEntry::new)
                .collect(),
            tags: dedupe(
                work.genres
                    .into_iter()
                    .filter_map(|g| non_empty(g.name))
                    .map(NamedEntry::new)
                    .collect(),
            ),
        })
    }

    fn query_fragment_returns_list(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head><title>x</title></head><body>
<div id="app">content</div>
<script id="__NEXT_DATA__" type="application/json">{"props":{"pageProps":{"work":{
  "title":"Example Work",
  "work_id":"SSIS-001",
  "note":"",
  "min_date":"Wed Jan 15 2020",
  "products":[{"image_url":"https://img.test/cover.jpg","maker":{"name":"Studio X"}}],
  "casts":[{"actor":{"name":"Performer A"}},{"actor":{"name":"Performer B"}},{"other":1}],
  "genres":[{"name":"Tag1"},{"name":"Tag2"},{"name":"Tag1"}]
}}}}</script></body></html>"#;

    #[test]
    fn test_extract_from_next_data() {
        let record = AvBase
            .extract(PAGE, "https://www.avbase.net/works/SSIS-001")
            .unwrap();
        assert_eq!(record.title.as_deref(), Some("Example Work"));
        assert_eq!(record.code.as_deref(), Some("SSIS-001"));
        // Empty note must not survive as a present-but-empty field.
        assert_eq!(record.details, None);
        assert_eq!(record.date.as_deref(), Some("2020-01-15"));
        assert_eq!(record.image.as_deref(), Some("https://img.test/cover.jpg"));
        assert_eq!(record.studio.as_ref().unwrap().name, "Studio X");
        let performers: Vec<&str> = record.performers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(performers, vec!["Performer A", "Performer B"]);
        let tags: Vec<&str> = record.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(tags, vec!["Tag1", "Tag2"]);
    }

    #[test]
    fn test_extract_fails_without_next_data() {
        let err = AvBase
            .extract("<html><body>challenge page</body></html>", "https://x")
            .unwrap_err();
        assert!(matches!(err, ScrapeError::PageStructure(_)));
    }

    #[test]
    fn test_extract_fails_without_work_node() {
        let page = r#"<script id="__NEXT_DATA__">{"props":{"pageProps":{}}}</script>"#;
        let err = AvBase.extract(page, "https://x").unwrap_err();
        assert!(matches!(err, ScrapeError::PageStructure(_)));
    }

    #[test]
    fn test_clean_fragment_strips_fc2_prefixes() {
        let site = AvBase;
        assert_eq!(site.clean_fragment("FC2-PPV-1234567").as_deref(), Some("1234567"));
        assert_eq!(site.clean_fragment("fc2ppv 1234567").as_deref(), Some("1234567"));
        assert_eq!(site.clean_fragment("ssis-001 [1080p]").as_deref(), Some("SSIS-0011080P"));
        assert_eq!(site.clean_fragment("!!??"), None);
    }

    #[test]
    fn test_parse_text_date() {
        assert_eq!(parse_text_date("Wed Jan 15 2020").as_deref(), Some("2020-01-15"));
        assert_eq!(parse_text_date("Fri Jul 9 2021").as_deref(), Some("2021-07-09"));
        // Unknown month falls back to "01" instead of failing.
        assert_eq!(parse_text_date("Wed Foo 15 2020").as_deref(), Some("2020-01-15"));
        assert_eq!(parse_text_date("2020-01-15"), None);
    }

    #[test]
    fn test_code_from_url() {
        let site = AvBase;
        assert_eq!(
            site.code_from_url("https://www.avbase.net/works/SSIS-001?tab=1").as_deref(),
            Some("SSIS-001"),
        );
        assert_eq!(site.code_from_url("https://dl.getchu.com/i/item1234567"), None);
    }

    #[test]
    fn test_code_from_stem_falls_back_to_bare_stem() {
        let site = AvBase;
        assert_eq!(site.code_from_stem("ssis-001 1080p").as_deref(), Some("SSIS-001"));
        assert_eq!(site.code_from_stem("my video").as_deref(), Some("my video"));
        assert_eq!(site.code_from_stem(""), None);
    }

    #[test]
    fn test_code_from_title_is_strict() {
        let site = AvBase;
        assert_eq!(site.code_from_title("[NCY-266] something").as_deref(), Some("NCY-266"));
        // No raw-title fallback.
        assert_eq!(site.code_from_title("just a plain title"), None);
        // Letter prefix required; a bare digit run is not a code.
        assert_eq!(site.code_from_title("1234567"), None);
    }

    #[test]
    fn test_fragment_to_detail_url() {
        let site = AvBase;
        let code = site.clean_fragment("FC2-PPV-1234567").unwrap();
        assert_eq!(site.detail_url(&code), "https://www.avbase.net/works/1234567");
    }
}
