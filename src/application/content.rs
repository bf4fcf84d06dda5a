//! Page contexts assembled from freshly fetched collections.

use std::collections::BTreeSet;

use tracing::debug;

use crate::application::error::AppError;
use crate::application::fetcher::CollectionFetcher;
use crate::application::view::{ViewSnapshot, load_snapshot};
use crate::config::ContentSettings;
use crate::domain::catalog::{Listing, active_tags, collect_tags, select};
use crate::domain::collections::CollectionName;
use crate::domain::entities::{BlogEntry, ClientEntry, ProjectEntry};
use crate::domain::error::DomainError;
use crate::domain::record::Record;
use crate::presentation::views::{
    BlogCard, BlogDetailContext, ClientLogo, HomeContext, ListingContext, ProjectCard,
    build_tag_toggles,
};

pub const BLOGS_PATH: &str = "/blogs";
pub const PROJECTS_PATH: &str = "/projects";

/// Tag and text filter requested by a visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    pub tags: BTreeSet<String>,
    pub query: String,
}

impl ListingFilter {
    pub fn from_query(tags: Option<&str>, query: Option<&str>) -> Self {
        Self {
            tags: active_tags(tags),
            query: query.map(str::trim).unwrap_or_default().to_string(),
        }
    }
}

/// Every call performs its own fetches; nothing is shared between pages.
#[derive(Clone)]
pub struct ContentService {
    fetcher: CollectionFetcher,
    settings: ContentSettings,
}

impl ContentService {
    pub fn new(fetcher: CollectionFetcher, settings: ContentSettings) -> Self {
        Self { fetcher, settings }
    }

    /// Work section, client strip and latest posts, fetched concurrently.
    pub async fn home(&self) -> HomeContext {
        let (projects, clients, blogs) = tokio::join!(
            load_snapshot::<ProjectEntry>(&self.fetcher),
            load_snapshot::<ClientEntry>(&self.fetcher),
            load_snapshot::<BlogEntry>(&self.fetcher),
        );

        let excerpt = self.settings.excerpt_length;
        HomeContext {
            projects: projects
                .items
                .iter()
                .take(self.settings.home_project_limit)
                .map(|entry| ProjectCard::from_entry(entry, excerpt))
                .collect(),
            clients: clients.items.iter().map(ClientLogo::from_entry).collect(),
            blogs: blogs
                .items
                .iter()
                .take(self.settings.home_blog_limit)
                .map(|entry| BlogCard::from_entry(entry, excerpt))
                .collect(),
        }
    }

    pub async fn blogs(&self, filter: &ListingFilter) -> ListingContext<BlogCard> {
        let snapshot = load_snapshot::<BlogEntry>(&self.fetcher).await;
        let excerpt = self.settings.excerpt_length;
        listing(BLOGS_PATH, snapshot, filter, |entry| {
            BlogCard::from_entry(entry, excerpt)
        })
    }

    pub async fn projects(&self, filter: &ListingFilter) -> ListingContext<ProjectCard> {
        let snapshot = load_snapshot::<ProjectEntry>(&self.fetcher).await;
        let excerpt = self.settings.excerpt_length;
        listing(PROJECTS_PATH, snapshot, filter, |entry| {
            ProjectCard::from_entry(entry, excerpt)
        })
    }

    /// Single blog entry addressed by its slug.
    pub async fn blog(&self, slug: &str) -> Result<BlogDetailContext, AppError> {
        let snapshot = load_snapshot::<BlogEntry>(&self.fetcher).await;
        snapshot
            .items
            .iter()
            .find(|entry| !entry.slug.is_empty() && entry.slug == slug)
            .map(BlogDetailContext::from_entry)
            .ok_or_else(|| DomainError::not_found("blog").into())
    }

    /// Raw decoded records of any collection, filtered like a listing page.
    /// A failed fetch is an error here, not an empty list.
    pub async fn records(
        &self,
        collection: &str,
        filter: &ListingFilter,
    ) -> Result<Vec<Record>, AppError> {
        let collection = CollectionName::parse(collection)?;
        let records = self
            .fetcher
            .try_fetch(&collection)
            .await
            .map_err(|source| AppError::store(&collection, source))?;
        let selected = select(&records, &filter.tags, &filter.query);
        debug!(
            target = "showcase::content",
            collection = %collection,
            fetched = records.len(),
            selected = selected.len(),
            "records selected"
        );
        Ok(selected.into_iter().cloned().collect())
    }
}

fn listing<T, C, F>(
    base_path: &str,
    snapshot: ViewSnapshot<T>,
    filter: &ListingFilter,
    to_card: F,
) -> ListingContext<C>
where
    T: Listing,
    F: Fn(&T) -> C,
{
    let all_tags = collect_tags(&snapshot.items);
    let selected = select(&snapshot.items, &filter.tags, &filter.query);
    let cards: Vec<C> = selected.into_iter().map(to_card).collect();

    ListingContext {
        base_path: base_path.to_string(),
        tag_toggles: build_tag_toggles(base_path, &all_tags, filter),
        active_tags: filter.tags.iter().cloned().collect::<Vec<_>>().join(", "),
        query: filter.query.clone(),
        total: snapshot.items.len(),
        shown: cards.len(),
        has_results: !cards.is_empty(),
        filtered: !filter.tags.is_empty() || !filter.query.is_empty(),
        cards,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_parses_comma_separated_tags() {
        let filter = ListingFilter::from_query(Some("web, ai,,web"), Some("  cloud "));
        assert_eq!(
            filter.tags.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["ai", "web"]
        );
        assert_eq!(filter.query, "cloud");
    }

    #[test]
    fn missing_parameters_mean_no_filter() {
        assert_eq!(ListingFilter::from_query(None, None), ListingFilter::default());
    }
}
