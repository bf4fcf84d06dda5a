//! Presentation entities derived from decoded records.

use std::borrow::Cow;

use time::OffsetDateTime;

use super::catalog::{Listing, sort_by_priority, sort_newest_first};
use super::collections::{BLOGS, CLIENTS, CollectionEntity, CollectionName, PROJECTS};
use super::normalize::{format_day, parse_timestamp, record_slug};
use super::record::Record;

const PHOTO_URL: &str = "photoURL";

#[derive(Debug, Clone, PartialEq)]
pub struct BlogEntry {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub photo_url: String,
    pub link: String,
    pub content: String,
    pub tags: Vec<String>,
    /// Date exactly as stored.
    pub date: String,
    pub published_at: Option<OffsetDateTime>,
    pub priority: f64,
}

impl BlogEntry {
    /// `5th Jun 2024`, or empty when the stored date is unusable.
    pub fn pretty_date(&self) -> String {
        self.published_at
            .and_then(|value| format_day(value.date()))
            .unwrap_or_default()
    }
}

impl CollectionEntity for BlogEntry {
    fn collection() -> CollectionName {
        CollectionName::from_static(BLOGS)
    }

    fn from_record(record: &Record) -> Self {
        let date = record.text("date").unwrap_or_default();
        Self {
            slug: record_slug(record, "title", "name"),
            title: record
                .text("title")
                .or_else(|| record.text("name"))
                .unwrap_or_default(),
            description: record.text("description").unwrap_or_default(),
            photo_url: record.text(PHOTO_URL).unwrap_or_default(),
            link: record.text("link").unwrap_or_default(),
            content: record.text("content").unwrap_or_default(),
            tags: record.tags(),
            published_at: parse_timestamp(&date),
            date,
            priority: record.number("priority").unwrap_or(0.0),
        }
    }

    fn sort(items: &mut [Self]) {
        sort_newest_first(items, |entry| entry.published_at);
    }
}

impl Listing for BlogEntry {
    fn display_name(&self) -> &str {
        &self.title
    }

    fn tags(&self) -> Cow<'_, [String]> {
        Cow::Borrowed(&self.tags)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectEntry {
    pub slug: String,
    pub name: String,
    pub title: String,
    pub description: String,
    pub photo_url: String,
    pub link: String,
    pub tags: Vec<String>,
    pub priority: f64,
}

impl ProjectEntry {
    /// `name` when present, otherwise `title`.
    pub fn heading(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.title
        } else {
            &self.name
        }
    }
}

impl CollectionEntity for ProjectEntry {
    fn collection() -> CollectionName {
        CollectionName::from_static(PROJECTS)
    }

    fn from_record(record: &Record) -> Self {
        Self {
            slug: record_slug(record, "name", "title"),
            name: record.text("name").unwrap_or_default(),
            title: record.text("title").unwrap_or_default(),
            description: record.text("description").unwrap_or_default(),
            photo_url: record.text(PHOTO_URL).unwrap_or_default(),
            link: record.text("link").unwrap_or_default(),
            tags: record.tags(),
            priority: record.number("priority").unwrap_or(0.0),
        }
    }

    fn sort(items: &mut [Self]) {
        sort_by_priority(items, |entry| entry.priority);
    }
}

impl Listing for ProjectEntry {
    fn display_name(&self) -> &str {
        self.heading()
    }

    fn tags(&self) -> Cow<'_, [String]> {
        Cow::Borrowed(&self.tags)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientEntry {
    pub name: String,
    pub photo_url: String,
    pub link: String,
}

/// Logos shown when the clients collection cannot be fetched.
const FALLBACK_CLIENTS: [(&str, &str, &str); 4] = [
    (
        "Northwind Logistics",
        "/static/clients/northwind.svg",
        "https://northwind.example.com",
    ),
    (
        "Helios Energy",
        "/static/clients/helios.svg",
        "https://helios.example.com",
    ),
    (
        "Bluefin Health",
        "/static/clients/bluefin.svg",
        "https://bluefin.example.com",
    ),
    (
        "Quarry Labs",
        "/static/clients/quarry.svg",
        "https://quarry.example.com",
    ),
];

impl CollectionEntity for ClientEntry {
    fn collection() -> CollectionName {
        CollectionName::from_static(CLIENTS)
    }

    fn from_record(record: &Record) -> Self {
        Self {
            name: record.text("name").unwrap_or_default(),
            photo_url: record.text(PHOTO_URL).unwrap_or_default(),
            link: record.text("link").unwrap_or_default(),
        }
    }

    fn fallback() -> Vec<Self> {
        FALLBACK_CLIENTS
            .iter()
            .map(|(name, photo_url, link)| Self {
                name: (*name).to_string(),
                photo_url: (*photo_url).to_string(),
                link: (*link).to_string(),
            })
            .collect()
    }
}
