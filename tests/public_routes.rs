use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use showcase::{
    application::{
        content::ContentService,
        fetcher::CollectionFetcher,
        store::{DocumentStore, StoreError},
    },
    config::{ContentSettings, SiteSettings},
    domain::{
        collections::CollectionName,
        wire::{WireDocument, WireField},
    },
    infra::http::{HttpState, REQUEST_ID_HEADER, build_router},
};
use tower::ServiceExt;

/// Serves canned documents; collections without an entry fail.
struct InMemoryStore {
    collections: HashMap<String, Vec<WireDocument>>,
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn list_documents(
        &self,
        collection: &CollectionName,
    ) -> Result<Vec<WireDocument>, StoreError> {
        self.collections
            .get(collection.as_str())
            .cloned()
            .ok_or(StoreError::Status {
                status: 500,
                body: "unavailable".to_string(),
            })
    }
}

fn document(fields: &[(&str, WireField)]) -> WireDocument {
    WireDocument {
        fields: fields
            .iter()
            .map(|(key, value)| ((*key).to_string(), value.clone()))
            .collect::<BTreeMap<_, _>>(),
        ..WireDocument::default()
    }
}

fn site() -> SiteSettings {
    SiteSettings {
        title: "Atelier".to_string(),
        description: "Software studio".to_string(),
        public_url: "https://atelier.example.com".to_string(),
        footer: "© Atelier".to_string(),
    }
}

fn router_with(collections: HashMap<String, Vec<WireDocument>>) -> Router {
    let store = InMemoryStore { collections };
    let fetcher = CollectionFetcher::new(Arc::new(store));
    let content = ContentService::new(fetcher, ContentSettings::default());
    build_router(HttpState::new(content, site()))
}

fn seeded_router() -> Router {
    let mut collections = HashMap::new();
    collections.insert(
        "blogs".to_string(),
        vec![
            document(&[
                ("title", WireField::string("Shipping Rust Services")),
                ("date", WireField::timestamp("2024-03-01T09:00:00Z")),
                ("description", WireField::string("Lessons from production.")),
                (
                    "content",
                    WireField::string("First paragraph.\n\nSecond paragraph."),
                ),
                (
                    "tags",
                    WireField::array(vec![WireField::string("rust"), WireField::string("ops")]),
                ),
            ]),
            document(&[
                ("title", WireField::string("Designing For Mobile")),
                ("date", WireField::string("2023-11-12")),
                ("tags", WireField::string("mobile")),
            ]),
        ],
    );
    collections.insert(
        "projects".to_string(),
        vec![
            document(&[
                ("name", WireField::string("Freight Tracker")),
                ("priority", WireField::integer("2")),
                ("tags", WireField::string("web, logistics")),
            ]),
            document(&[
                ("name", WireField::string("Clinic Portal")),
                ("priority", WireField::integer("1")),
                ("tags", WireField::string("health")),
            ]),
        ],
    );
    router_with(collections)
}

async fn get(router: Router, uri: &str) -> (StatusCode, String) {
    let response = router
        .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

#[tokio::test]
async fn blogs_page_lists_entries_newest_first() {
    let (status, body) = get(seeded_router(), "/blogs").await;

    assert_eq!(status, StatusCode::OK);
    let newer = body.find("Shipping Rust Services").expect("newer post");
    let older = body.find("Designing For Mobile").expect("older post");
    assert!(newer < older);
    assert!(body.contains("1st Mar 2024"));
    assert!(body.contains("12nd Nov 2023"));
}

#[tokio::test]
async fn blogs_page_filters_by_tag() {
    let (status, body) = get(seeded_router(), "/blogs?tags=mobile").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Designing For Mobile"));
    assert!(!body.contains("Shipping Rust Services"));
    assert!(body.contains("Showing 1 of 2"));
}

#[tokio::test]
async fn projects_page_orders_by_priority() {
    let (status, body) = get(seeded_router(), "/projects").await;

    assert_eq!(status, StatusCode::OK);
    let first = body.find("Clinic Portal").expect("first project");
    let second = body.find("Freight Tracker").expect("second project");
    assert!(first < second);
}

#[tokio::test]
async fn projects_query_matches_case_insensitively() {
    let (_, body) = get(seeded_router(), "/projects?q=FREIGHT").await;

    assert!(body.contains("Freight Tracker"));
    assert!(!body.contains("Clinic Portal"));
}

#[tokio::test]
async fn blog_detail_renders_paragraphs() {
    let (status, body) = get(seeded_router(), "/blogs/shipping-rust-services").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<p>First paragraph.</p>"));
    assert!(body.contains("<p>Second paragraph.</p>"));
}

#[tokio::test]
async fn unknown_blog_slug_is_not_found() {
    let (status, body) = get(seeded_router(), "/blogs/no-such-post").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Page Not Found"));
}

#[tokio::test]
async fn home_falls_back_to_default_clients() {
    let (status, body) = get(seeded_router(), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Northwind Logistics"));
    assert!(body.contains("Clinic Portal"));
    assert!(body.contains("Shipping Rust Services"));
}

#[tokio::test]
async fn failed_collections_render_empty_listing() {
    let (status, body) = get(router_with(HashMap::new()), "/projects").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No projects yet."));
}

#[tokio::test]
async fn legal_pages_render() {
    for (path, title) in [
        ("/privacy", "Privacy Policy"),
        ("/terms", "Terms of Service"),
        ("/refund", "Refund Policy"),
    ] {
        let (status, body) = get(seeded_router(), path).await;
        assert_eq!(status, StatusCode::OK, "{path}");
        assert!(body.contains(title), "{path}");
    }
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (status, _) = get(seeded_router(), "/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_returns_no_content() {
    let (status, body) = get(seeded_router(), "/_health").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
}

#[tokio::test]
async fn collection_api_returns_selected_records() {
    let (status, body) = get(seeded_router(), "/api/collections/projects?tags=health").await;

    assert_eq!(status, StatusCode::OK);
    let records: serde_json::Value = serde_json::from_str(&body).expect("json body");
    assert_eq!(
        records,
        serde_json::json!([
            { "name": "Clinic Portal", "priority": 1, "tags": "health" }
        ])
    );
}

#[tokio::test]
async fn collection_api_rejects_invalid_names() {
    let (status, _) = get(seeded_router(), "/api/collections/bad.name").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn fallback_client_logos_resolve() {
    let (_, home) = get(router_with(HashMap::new()), "/").await;
    assert!(home.contains("/static/clients/northwind.svg"));

    let response = router_with(HashMap::new())
        .oneshot(
            Request::get("/static/clients/northwind.svg")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().expect("ascii"),
        "image/svg+xml"
    );
}

#[tokio::test]
async fn stylesheet_is_served() {
    let (status, body) = get(seeded_router(), "/static/site.css").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(".card-grid"));
}

#[tokio::test]
async fn unknown_or_escaping_asset_paths_are_not_found() {
    for uri in ["/static/clients/missing.svg", "/static/clients/../site.css"] {
        let (status, _) = get(seeded_router(), uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn collection_api_reports_store_failure() {
    let (status, body) = get(router_with(HashMap::new()), "/api/collections/projects").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, "Content store unavailable");
}

#[tokio::test]
async fn responses_carry_request_id() {
    let response = seeded_router()
        .oneshot(Request::get("/_health").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    let request_id = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .expect("request id header")
        .to_str()
        .expect("ascii");
    uuid::Uuid::parse_str(request_id).expect("uuid request id");
}
