use std::collections::BTreeSet;

use crate::application::content::ListingFilter;
use crate::application::error::{ErrorReport, HttpError};
use crate::config::SiteSettings;
use crate::domain::entities::{BlogEntry, ClientEntry, ProjectEntry};
use crate::domain::legal::LegalDocument;
use crate::domain::normalize::truncate;
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use url::form_urlencoded;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) origin: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(origin: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            origin,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            origin,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            origin,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(chrome: LayoutChrome) -> Response {
    let content = ErrorPageView::not_found();
    let view = LayoutContext::new(chrome, content);
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

const PRIMARY_LINKS: [(&str, &str); 3] = [("Home", "/"), ("Projects", "/projects"), ("Blog", "/blogs")];
const LEGAL_DOCUMENTS: [LegalDocument; 3] = [
    LegalDocument::Privacy,
    LegalDocument::Terms,
    LegalDocument::Refund,
];

#[derive(Clone)]
pub struct NavigationView {
    pub entries: Vec<NavigationLinkView>,
}

#[derive(Clone)]
pub struct FooterView {
    pub copy: String,
    pub legal: Vec<NavigationLinkView>,
}

#[derive(Clone)]
pub struct BrandView {
    pub title: String,
    pub href: String,
}

#[derive(Clone)]
pub struct NavigationLinkView {
    pub label: String,
    pub href: String,
    pub active: bool,
}

#[derive(Clone)]
pub struct PageMetaView {
    pub title: String,
    pub description: String,
    pub canonical: String,
}

#[derive(Clone)]
pub struct LayoutChrome {
    pub brand: BrandView,
    pub navigation: NavigationView,
    pub footer: FooterView,
    pub meta: PageMetaView,
}

impl LayoutChrome {
    /// Chrome for the page at `path`. `page_title` is prefixed to the site
    /// title when given.
    pub fn for_page(site: &SiteSettings, path: &str, page_title: Option<&str>) -> Self {
        let section = primary_section(path);
        let entries = PRIMARY_LINKS
            .iter()
            .map(|(label, href)| NavigationLinkView {
                label: (*label).to_string(),
                href: (*href).to_string(),
                active: *href == section,
            })
            .collect();
        let legal = LEGAL_DOCUMENTS
            .iter()
            .map(|document| NavigationLinkView {
                label: document.title().to_string(),
                href: document.path().to_string(),
                active: document.path() == path,
            })
            .collect();

        let title = match page_title {
            Some(page) => format!("{page} | {}", site.title),
            None => site.title.clone(),
        };

        Self {
            brand: BrandView {
                title: site.title.clone(),
                href: "/".to_string(),
            },
            navigation: NavigationView { entries },
            footer: FooterView {
                copy: site.footer.clone(),
                legal,
            },
            meta: PageMetaView {
                title,
                description: site.description.clone(),
                canonical: canonical_url(&site.public_url, path),
            },
        }
    }
}

fn primary_section(path: &str) -> &str {
    PRIMARY_LINKS
        .iter()
        .map(|(_, href)| *href)
        .filter(|href| *href != "/")
        .find(|href| path == *href || path.starts_with(&format!("{href}/")))
        .unwrap_or(if path == "/" { "/" } else { "" })
}

fn canonical_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub brand: BrandView,
    pub navigation: NavigationView,
    pub footer: FooterView,
    pub meta: PageMetaView,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, content: T) -> Self {
        Self {
            brand: chrome.brand,
            navigation: chrome.navigation,
            footer: chrome.footer,
            meta: chrome.meta,
            content,
        }
    }
}

/// A tag chip that links to the listing with this tag toggled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagToggle {
    pub label: String,
    pub href: String,
    pub active: bool,
}

pub fn build_tag_toggles(
    base_path: &str,
    all_tags: &[String],
    filter: &ListingFilter,
) -> Vec<TagToggle> {
    all_tags
        .iter()
        .map(|tag| {
            let active = filter.tags.contains(tag);
            let mut toggled: BTreeSet<String> = filter.tags.clone();
            if active {
                toggled.remove(tag);
            } else {
                toggled.insert(tag.clone());
            }
            TagToggle {
                label: tag.clone(),
                href: listing_href(base_path, &toggled, &filter.query),
                active,
            }
        })
        .collect()
}

pub fn listing_href(base_path: &str, tags: &BTreeSet<String>, query: &str) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    if !tags.is_empty() {
        serializer.append_pair("tags", &tags.iter().cloned().collect::<Vec<_>>().join(","));
    }
    if !query.is_empty() {
        serializer.append_pair("q", query);
    }
    let encoded = serializer.finish();
    if encoded.is_empty() {
        base_path.to_string()
    } else {
        format!("{base_path}?{encoded}")
    }
}

#[derive(Clone, Debug)]
pub struct BlogCard {
    pub href: String,
    pub title: String,
    pub excerpt: String,
    pub photo_url: String,
    pub link: String,
    pub tags: Vec<String>,
    pub date_label: String,
    pub iso_date: String,
}

impl BlogCard {
    pub fn from_entry(entry: &BlogEntry, excerpt_length: usize) -> Self {
        let source = if entry.description.trim().is_empty() {
            &entry.content
        } else {
            &entry.description
        };
        Self {
            href: blog_href(&entry.slug),
            title: entry.title.clone(),
            excerpt: truncate(source.trim(), excerpt_length),
            photo_url: entry.photo_url.clone(),
            link: entry.link.clone(),
            tags: entry.tags.clone(),
            date_label: entry.pretty_date(),
            iso_date: iso_date(entry),
        }
    }
}

fn blog_href(slug: &str) -> String {
    if slug.is_empty() {
        String::new()
    } else {
        format!("/blogs/{slug}")
    }
}

fn iso_date(entry: &BlogEntry) -> String {
    entry
        .published_at
        .and_then(|value| value.format(&Rfc3339).ok())
        .unwrap_or_default()
}

#[derive(Clone, Debug)]
pub struct ProjectCard {
    pub heading: String,
    pub excerpt: String,
    pub photo_url: String,
    pub link: String,
    pub tags: Vec<String>,
}

impl ProjectCard {
    pub fn from_entry(entry: &ProjectEntry, excerpt_length: usize) -> Self {
        Self {
            heading: entry.heading().to_string(),
            excerpt: truncate(entry.description.trim(), excerpt_length),
            photo_url: entry.photo_url.clone(),
            link: entry.link.clone(),
            tags: entry.tags.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ClientLogo {
    pub name: String,
    pub photo_url: String,
    pub link: String,
}

impl ClientLogo {
    pub fn from_entry(entry: &ClientEntry) -> Self {
        Self {
            name: entry.name.clone(),
            photo_url: entry.photo_url.clone(),
            link: entry.link.clone(),
        }
    }
}

pub struct HomeContext {
    pub projects: Vec<ProjectCard>,
    pub clients: Vec<ClientLogo>,
    pub blogs: Vec<BlogCard>,
}

pub struct ListingContext<C> {
    pub base_path: String,
    pub cards: Vec<C>,
    pub tag_toggles: Vec<TagToggle>,
    pub active_tags: String,
    pub query: String,
    pub total: usize,
    pub shown: usize,
    pub has_results: bool,
    pub filtered: bool,
}

pub struct BlogDetailContext {
    pub title: String,
    pub date_label: String,
    pub iso_date: String,
    pub description: String,
    pub photo_url: String,
    pub link: String,
    pub tags: Vec<String>,
    pub paragraphs: Vec<String>,
}

impl BlogDetailContext {
    pub fn from_entry(entry: &BlogEntry) -> Self {
        Self {
            title: entry.title.clone(),
            date_label: entry.pretty_date(),
            iso_date: iso_date(entry),
            description: entry.description.clone(),
            photo_url: entry.photo_url.clone(),
            link: entry.link.clone(),
            tags: entry.tags.clone(),
            paragraphs: paragraphs(&entry.content),
        }
    }
}

/// Blank-line separated blocks of `text`, trimmed.
fn paragraphs(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(str::to_string)
        .collect()
}

pub struct LegalSectionView {
    pub heading: String,
    pub paragraphs: Vec<String>,
}

pub struct LegalView {
    pub title: String,
    pub sections: Vec<LegalSectionView>,
}

impl LegalView {
    pub fn from_document(document: LegalDocument) -> Self {
        Self {
            title: document.title().to_string(),
            sections: document
                .sections()
                .iter()
                .map(|section| LegalSectionView {
                    heading: section.heading.to_string(),
                    paragraphs: section.paragraphs.iter().map(|p| (*p).to_string()).collect(),
                })
                .collect(),
        }
    }
}

pub struct ErrorPageView {
    pub title: String,
    pub message: String,
    pub action_href: String,
    pub action_label: String,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            title: "Page Not Found".to_string(),
            message: "The page you requested does not exist. Try returning to the homepage to continue exploring.".to_string(),
            action_href: "/".to_string(),
            action_label: "Back to home".to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub view: LayoutContext<HomeContext>,
}

#[derive(Template)]
#[template(path = "blogs.html")]
pub struct BlogsTemplate {
    pub view: LayoutContext<ListingContext<BlogCard>>,
}

#[derive(Template)]
#[template(path = "blog.html")]
pub struct BlogTemplate {
    pub view: LayoutContext<BlogDetailContext>,
}

#[derive(Template)]
#[template(path = "projects.html")]
pub struct ProjectsTemplate {
    pub view: LayoutContext<ListingContext<ProjectCard>>,
}

#[derive(Template)]
#[template(path = "legal.html")]
pub struct LegalTemplate {
    pub view: LayoutContext<LegalView>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}
