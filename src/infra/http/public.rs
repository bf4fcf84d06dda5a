use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;

use crate::{
    application::content::{BLOGS_PATH, ContentService, ListingFilter, PROJECTS_PATH},
    config::SiteSettings,
    domain::legal::LegalDocument,
    infra::assets::serve_static,
    presentation::views::{
        BlogTemplate, BlogsTemplate, IndexTemplate, LayoutChrome, LayoutContext, LegalTemplate,
        LegalView, ProjectsTemplate, render_not_found_response, render_template_response,
    },
};

use super::middleware::trace_requests;

#[derive(Clone)]
pub struct HttpState {
    pub content: Arc<ContentService>,
    pub site: Arc<SiteSettings>,
}

impl HttpState {
    pub fn new(content: ContentService, site: SiteSettings) -> Self {
        Self {
            content: Arc::new(content),
            site: Arc::new(site),
        }
    }

    fn chrome(&self, path: &str, page_title: Option<&str>) -> LayoutChrome {
        LayoutChrome::for_page(&self.site, path, page_title)
    }
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index))
        .route(BLOGS_PATH, get(blogs_index))
        .route("/blogs/{slug}", get(blog_detail))
        .route(PROJECTS_PATH, get(projects_index))
        .route("/privacy", get(privacy))
        .route("/terms", get(terms))
        .route("/refund", get(refund))
        .route("/api/collections/{name}", get(collection_records))
        .route("/static/{*path}", get(serve_static))
        .route("/_health", get(health))
        .fallback(fallback)
        .with_state(state)
        .layer(middleware::from_fn(trace_requests))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListingQuery {
    tags: Option<String>,
    q: Option<String>,
}

impl ListingQuery {
    fn filter(&self) -> ListingFilter {
        ListingFilter::from_query(self.tags.as_deref(), self.q.as_deref())
    }
}

async fn index(State(state): State<HttpState>) -> Response {
    let content = state.content.home().await;
    let view = LayoutContext::new(state.chrome("/", None), content);
    render_template_response(IndexTemplate { view }, StatusCode::OK)
}

async fn blogs_index(
    State(state): State<HttpState>,
    Query(query): Query<ListingQuery>,
) -> Response {
    let content = state.content.blogs(&query.filter()).await;
    let view = LayoutContext::new(state.chrome(BLOGS_PATH, Some("Blog")), content);
    render_template_response(BlogsTemplate { view }, StatusCode::OK)
}

async fn projects_index(
    State(state): State<HttpState>,
    Query(query): Query<ListingQuery>,
) -> Response {
    let content = state.content.projects(&query.filter()).await;
    let view = LayoutContext::new(state.chrome(PROJECTS_PATH, Some("Projects")), content);
    render_template_response(ProjectsTemplate { view }, StatusCode::OK)
}

async fn blog_detail(State(state): State<HttpState>, Path(slug): Path<String>) -> Response {
    let path = format!("{BLOGS_PATH}/{slug}");
    match state.content.blog(&slug).await {
        Ok(content) => {
            let chrome = state.chrome(&path, Some(&content.title));
            let view = LayoutContext::new(chrome, content);
            render_template_response(BlogTemplate { view }, StatusCode::OK)
        }
        Err(err) if err.is_not_found() => render_not_found_response(state.chrome(&path, None)),
        Err(err) => err.into_response(),
    }
}

async fn privacy(State(state): State<HttpState>) -> Response {
    legal_page(&state, LegalDocument::Privacy)
}

async fn terms(State(state): State<HttpState>) -> Response {
    legal_page(&state, LegalDocument::Terms)
}

async fn refund(State(state): State<HttpState>) -> Response {
    legal_page(&state, LegalDocument::Refund)
}

fn legal_page(state: &HttpState, document: LegalDocument) -> Response {
    let chrome = state.chrome(document.path(), Some(document.title()));
    let view = LayoutContext::new(chrome, LegalView::from_document(document));
    render_template_response(LegalTemplate { view }, StatusCode::OK)
}

async fn collection_records(
    State(state): State<HttpState>,
    Path(name): Path<String>,
    Query(query): Query<ListingQuery>,
) -> Response {
    match state.content.records(&name, &query.filter()).await {
        Ok(records) => Json(records).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn fallback(State(state): State<HttpState>, uri: Uri) -> Response {
    render_not_found_response(state.chrome(uri.path(), None))
}
