use serde::{Deserialize, Serialize};

/// A named sub-entity of a scene record: studio, performer, or tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntry {
    pub name: String,
}

impl NamedEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Normalized metadata for one catalog item.
///
/// Absent fields are omitted from the serialized object rather than emitted
/// as `null`, so an empty record serializes to `{}`. Empty strings and empty
/// lists are stripped before they reach this struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Site-specific identifier (work code or item ID).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    /// Release date in ISO `YYYY-MM-DD` form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Canonical detail-page URL the record was scraped from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Cover-image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub studio: Option<NamedEntry>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub performers: Vec<NamedEntry>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<NamedEntry>,
}

impl SceneRecord {
    /// Project this record into the reduced shape used in list responses.
    pub fn to_stub(&self) -> SearchStub {
        SearchStub {
            title: self.title.clone(),
            url: self.url.clone(),
            date: self.date.clone(),
            image: self.image.clone(),
        }
    }
}

/// Reduced scene record used in search/list-mode responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStub {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Drop empty strings, keeping the field out of the output entirely.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// De-duplicate entries by name, keeping first-seen order.
pub fn dedupe(entries: Vec<NamedEntry>) -> Vec<NamedEntry> {
    let mut seen: Vec<NamedEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        if !seen.iter().any(|e| e.name == entry.name) {
            seen.push(entry);
        }
    }
    seen
}
