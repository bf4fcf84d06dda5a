//! Failures surfaced by handlers and commands, and the report the request
//! tracer reads back from failed responses.

use std::{error::Error as StdError, iter};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    application::store::StoreError, domain::collections::CollectionName,
    domain::error::DomainError, infra::error::InfraError,
};

/// Diagnostics for a failed response, stored as a response extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub origin: &'static str,
    pub status: StatusCode,
    /// Collection whose fetch or lookup failed, if any.
    pub collection: Option<String>,
    /// Outermost message first.
    pub chain: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(
        origin: &'static str,
        status: StatusCode,
        error: &(dyn StdError + 'static),
    ) -> Self {
        let chain = iter::successors(Some(error), |&err| err.source())
            .map(ToString::to_string)
            .collect();
        Self {
            origin,
            status,
            collection: None,
            chain,
        }
    }

    pub fn from_message(
        origin: &'static str,
        status: StatusCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            origin,
            status,
            collection: None,
            chain: vec![message.into()],
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    pub fn detail(&self) -> &str {
        self.chain
            .first()
            .map(String::as_str)
            .unwrap_or("no diagnostic available")
    }

    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

/// Plain-text failure response. Visitors see `public_message`; the report
/// goes to the logs.
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    public_message: &'static str,
    report: ErrorReport,
}

impl HttpError {
    pub fn from_error(
        origin: &'static str,
        status: StatusCode,
        public_message: &'static str,
        error: &(dyn StdError + 'static),
    ) -> Self {
        Self {
            status,
            public_message,
            report: ErrorReport::from_error(origin, status, error),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.public_message).into_response();
        self.report.attach(&mut response);
        response
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("collection `{collection}` could not be fetched")]
    Store {
        collection: String,
        #[source]
        source: StoreError,
    },
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn store(collection: &CollectionName, source: StoreError) -> Self {
        Self::Store {
            collection: collection.to_string(),
            source,
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Domain(DomainError::NotFound { .. }))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Domain(DomainError::NotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::Domain(DomainError::Validation { .. }) => StatusCode::BAD_REQUEST,
            AppError::Store { .. } => StatusCode::BAD_GATEWAY,
            AppError::Infra(_) | AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn collection(&self) -> Option<&str> {
        match self {
            AppError::Store { collection, .. } => Some(collection),
            _ => None,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            AppError::Domain(DomainError::NotFound { .. }) => "Resource not found",
            AppError::Domain(DomainError::Validation { .. }) => "Request could not be processed",
            AppError::Store { .. } => "Content store unavailable",
            AppError::Infra(_) | AppError::Unexpected(_) => "Unexpected error occurred",
        }
    }
}

impl From<AppError> for HttpError {
    fn from(err: AppError) -> Self {
        let mut http = HttpError::from_error(
            "application::error::AppError",
            err.status_code(),
            err.public_message(),
            &err,
        );
        if let Some(collection) = err.collection() {
            http.report = http.report.with_collection(collection);
        }
        http
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        HttpError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_client_statuses() {
        let not_found = AppError::from(DomainError::not_found("blog"));
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert!(not_found.is_not_found());

        let invalid = AppError::from(DomainError::validation("bad name"));
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
        assert!(!invalid.is_not_found());
    }

    #[test]
    fn store_failure_reports_collection_and_cause() {
        let collection = CollectionName::parse("projects").expect("name");
        let err = AppError::store(
            &collection,
            StoreError::Status {
                status: 503,
                body: "backend unavailable".to_string(),
            },
        );
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let report = response
            .extensions()
            .get::<ErrorReport>()
            .expect("report attached");
        assert_eq!(report.collection.as_deref(), Some("projects"));
        assert_eq!(
            report.chain,
            vec![
                "collection `projects` could not be fetched".to_string(),
                "unexpected status 503: backend unavailable".to_string(),
            ]
        );
    }

    #[test]
    fn unexpected_errors_keep_details_out_of_the_body() {
        let response = AppError::unexpected("boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let report = response
            .extensions()
            .get::<ErrorReport>()
            .expect("report attached");
        assert_eq!(report.detail(), "unexpected error: boom");
        assert_eq!(report.collection, None);
    }

    #[test]
    fn empty_report_has_placeholder_detail() {
        let mut report = ErrorReport::from_message("test", StatusCode::NOT_FOUND, "");
        report.chain.clear();
        assert_eq!(report.detail(), "no diagnostic available");
    }
}
