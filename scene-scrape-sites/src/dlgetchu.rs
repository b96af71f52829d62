use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use scene_scrape_core::record::dedupe;
use scene_scrape_core::{NamedEntry, SceneRecord};

use crate::client::TransportProfile;
use crate::error::ScrapeError;
use crate::site::SiteScraper;

static OG_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:title"]"#).unwrap());
static OG_IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:image"]"#).unwrap());
static META_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[name="description"]"#).unwrap());
static TITLE_TAG: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static CIRCLE_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[href*="dojin_circle_detail.php"]"#).unwrap());
static TABLE_CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());
static GENRE_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[href*="genre_id="]"#).unwrap());

static ITEM_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"item(\d+)").unwrap());

// Item IDs are long digit runs wherever they appear in filenames/titles.
static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d{6,})").unwrap());

static NON_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\d]").unwrap());

static DATE_CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})/(\d{2})/(\d{2})").unwrap());

// Site suffix after "|" or "-" in the <title> fallback.
static TITLE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*[|\-].*$").unwrap());

/// Scraper for dl.getchu.com item pages (DOM-scrape strategy).
///
/// The site is legacy server-rendered HTML served as EUC-JP; fields come
/// from og/meta tags, known link targets, and table cells.
pub struct DlGetchu;

fn meta_content(doc: &Html, selector: &Selector) -> Option<String> {
    doc.select(selector)
        .next()
        .and_then(|m| m.value().attr("content"))
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

fn element_text(element: scraper::ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

impl SiteScraper for DlGetchu {
    fn tag(&self) -> &'static str {
        "DLGetchu"
    }

    fn transport(&self) -> TransportProfile {
        TransportProfile::Plain
    }

    fn charset(&self) -> &'static str {
        "euc-jp"
    }

    fn detail_url(&self, code: &str) -> String {
        format!("https://dl.getchu.com/i/item{code}")
    }

    fn code_from_url(&self, url: &str) -> Option<String> {
        if !url.contains("dl.getchu.com") {
            return None;
        }
        ITEM_ID.captures(url).map(|caps| caps[1].to_string())
    }

    fn code_from_stem(&self, stem: &str) -> Option<String> {
        DIGIT_RUN.captures(stem).map(|caps| caps[1].to_string())
    }

    fn code_from_title(&self, title: &str) -> Option<String> {
        DIGIT_RUN.captures(title).map(|caps| caps[1].to_string())
    }

    fn clean_fragment(&self, fragment: &str) -> Option<String> {
        let digits = NON_DIGIT.replace_all(fragment, "").into_owned();
        if digits.is_empty() { None } else { Some(digits) }
    }

    fn extract(&self, html: &str, url: &str) -> Result<SceneRecord, ScrapeError> {
        let doc = Html::parse_document(html);

        let title = meta_content(&doc, &OG_TITLE).or_else(|| {
            doc.select(&TITLE_TAG)
                .next()
                .map(|t| {
                    let text = element_text(t);
                    TITLE_SUFFIX.replace(&text, "").trim().to_string()
                })
                .filter(|t| !t.is_empty())
        });

        let image = meta_content(&doc, &OG_IMAGE);
        let details = meta_content(&doc, &META_DESCRIPTION);

        let studio = doc
            .select(&CIRCLE_LINK)
            .next()
            .map(element_text)
            .filter(|s| !s.is_empty())
            .map(NamedEntry::new);

        // First table cell carrying a YYYY/MM/DD date wins.
        let date = doc.select(&TABLE_CELL).find_map(|td| {
            let text: String = td.text().collect();
            DATE_CELL
                .captures(&text)
                .map(|caps| format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]))
        });

        let tags = dedupe(
            doc.select(&GENRE_LINK)
                .map(element_text)
                .filter(|t| !t.is_empty())
                .map(NamedEntry::new)
                .collect(),
        );

        Ok(SceneRecord {
            title,
            // Any URL that reached extraction carries the item ID directly;
            // mirrors of the detail page keep the item<digits> path segment.
            code: ITEM_ID.captures(url).map(|caps| caps[1].to_string()),
            details,
            date,
            url: Some(url.to_string()),
            image,
            studio,
            performers: Vec::new(),
            tags,
        })
    }

    fn query_fragment_returns_list(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head>
<title>Example Item | DLgetchu</title>
<meta property="og:title" content="Example Item">
<meta property="og:image" content="https://dl.getchu.com/img/item1234567.jpg">
<meta name="description" content="An example description.">
</head><body>
<table>
<tr><td>Circle</td><td><a href="dojin_circle_detail.php?id=42">Circle A</a></td></tr>
<tr><td>Release</td><td>2021/07/09</td></tr>
<tr><td>Updated</td><td>2022/01/01</td></tr>
</table>
<a href="search.php?genre_id=1">Fantasy</a>
<a href="search.php?genre_id=2">Comedy</a>
<a href="search.php?genre_id=1">Fantasy</a>
</body></html>"#;

    #[test]
    fn test_extract_from_dom() {
        let url = "https://dl.getchu.com/i/item1234567";
        let record = DlGetchu.extract(PAGE, url).unwrap();
        assert_eq!(record.title.as_deref(), Some("Example Item"));
        assert_eq!(record.code.as_deref(), Some("1234567"));
        assert_eq!(record.details.as_deref(), Some("An example description."));
        // First matching cell wins.
        assert_eq!(record.date.as_deref(), Some("2021-07-09"));
        assert_eq!(record.url.as_deref(), Some(url));
        assert_eq!(
            record.image.as_deref(),
            Some("https://dl.getchu.com/img/item1234567.jpg"),
        );
        assert_eq!(record.studio.as_ref().unwrap().name, "Circle A");
        assert!(record.performers.is_empty());
        let tags: Vec<&str> = record.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(tags, vec!["Fantasy", "Comedy"]);
    }

    #[test]
    fn test_title_falls_back_to_title_tag() {
        let page = "<html><head><title>Bare Title - dl.getchu.com</title></head><body></body></html>";
        let record = DlGetchu
            .extract(page, "https://dl.getchu.com/i/item1111111")
            .unwrap();
        assert_eq!(record.title.as_deref(), Some("Bare Title"));
    }

    #[test]
    fn test_extract_on_bare_page_keeps_only_url_and_code() {
        let url = "https://dl.getchu.com/i/item2222222";
        let record = DlGetchu.extract("<html><body></body></html>", url).unwrap();
        assert_eq!(record.url.as_deref(), Some(url));
        assert_eq!(record.code.as_deref(), Some("2222222"));
        assert_eq!(record.title, None);
        assert!(record.tags.is_empty());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_clean_fragment_keeps_digits_only() {
        let site = DlGetchu;
        assert_eq!(site.clean_fragment("item 1234567?").as_deref(), Some("1234567"));
        assert_eq!(site.clean_fragment("no digits"), None);
    }

    #[test]
    fn test_extract_keeps_code_from_mirror_url() {
        // Extraction trusts whatever URL was fetched, unlike input
        // resolution which only claims URLs on the site's own host.
        let record = DlGetchu
            .extract("<html><body></body></html>", "https://mirror.test/i/item3333333")
            .unwrap();
        assert_eq!(record.code.as_deref(), Some("3333333"));
    }

    #[test]
    fn test_code_from_url_requires_site_domain() {
        let site = DlGetchu;
        assert_eq!(
            site.code_from_url("https://dl.getchu.com/i/item1234567").as_deref(),
            Some("1234567"),
        );
        assert_eq!(site.code_from_url("https://other.test/i/item1234567"), None);
    }

    #[test]
    fn test_code_from_stem_needs_long_digit_run() {
        let site = DlGetchu;
        assert_eq!(site.code_from_stem("getchu_1234567_hq").as_deref(), Some("1234567"));
        // Short digit runs and plain stems never resolve; no fallback here.
        assert_eq!(site.code_from_stem("ep12345"), None);
        assert_eq!(site.code_from_stem("my video"), None);
    }

    #[test]
    fn test_fragment_to_detail_url() {
        let site = DlGetchu;
        let code = site.clean_fragment("1234567").unwrap();
        assert_eq!(site.detail_url(&code), "https://dl.getchu.com/i/item1234567");
    }
}
