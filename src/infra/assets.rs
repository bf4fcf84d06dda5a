//! Stylesheet and client logos compiled into the binary and served under
//! `/static/`.

use axum::{
    extract::Path,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use include_dir::{Dir, File, include_dir};

use crate::application::error::ErrorReport;

static STATIC_DIR: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/static");

const CACHE_CONTROL: &str = "public, max-age=86400";

pub async fn serve_static(Path(path): Path<String>) -> Response {
    let Some(file) = embedded_file(&path) else {
        let mut response = (StatusCode::NOT_FOUND, "Not Found").into_response();
        ErrorReport::from_message(
            "infra::assets::serve_static",
            StatusCode::NOT_FOUND,
            format!("no embedded asset at `{path}`"),
        )
        .attach(&mut response);
        return response;
    };

    let mime = mime_guess::from_path(file.path()).first_or_octet_stream();
    let content_type = HeaderValue::from_str(mime.essence_str())
        .unwrap_or(HeaderValue::from_static("application/octet-stream"));
    (
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL)),
        ],
        file.contents(),
    )
        .into_response()
}

/// Embedded file at `path`, relative to the static root. Directory paths and
/// any `.` or `..` segment resolve to nothing.
pub fn embedded_file(path: &str) -> Option<&'static File<'static>> {
    let path = path.trim_start_matches('/');
    if path.is_empty()
        || path.ends_with('/')
        || path.split('/').any(|segment| segment == "." || segment == "..")
    {
        return None;
    }
    STATIC_DIR.get_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_logos_are_embedded() {
        for logo in ["northwind", "helios", "bluefin", "quarry"] {
            let path = format!("clients/{logo}.svg");
            assert!(embedded_file(&path).is_some(), "{path}");
        }
        assert!(embedded_file("site.css").is_some());
    }

    #[test]
    fn directories_and_parent_segments_are_rejected() {
        assert!(embedded_file("").is_none());
        assert!(embedded_file("clients/").is_none());
        assert!(embedded_file("clients/../site.css").is_none());
        assert!(embedded_file("./site.css").is_none());
        assert!(embedded_file("missing.css").is_none());
    }
}
