//! Named document collections and how each one is turned into entities.

use std::fmt;

use super::error::DomainError;
use super::record::Record;

pub const BLOGS: &str = "blogs";
pub const PROJECTS: &str = "projects";
pub const CLIENTS: &str = "clients";

/// A collection identifier that is safe to place in a URL path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionName(String);

impl CollectionName {
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(DomainError::validation("collection name must not be empty"));
        }
        if !value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
        {
            return Err(DomainError::validation(format!(
                "collection name `{value}` may only contain ASCII letters, digits, `-` and `_`"
            )));
        }
        Ok(Self(value.to_string()))
    }

    /// Built-in collections are known to be valid.
    pub(crate) fn from_static(value: &'static str) -> Self {
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An entity built from every document of one collection.
///
/// Implementors pick the collection, map a record to the entity, order the
/// fetched list, and choose what a failed fetch degrades to.
pub trait CollectionEntity: Sized + Send + 'static {
    fn collection() -> CollectionName;

    fn from_record(record: &Record) -> Self;

    /// Order the list for display. Fetch order is kept by default.
    fn sort(_items: &mut [Self]) {}

    /// Entries shown when the fetch fails.
    fn fallback() -> Vec<Self> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_collection_names() {
        let name = CollectionName::parse(" case_studies-2 ").expect("valid name");
        assert_eq!(name.as_str(), "case_studies-2");
    }

    #[test]
    fn rejects_path_characters() {
        assert!(CollectionName::parse("blogs/../admin").is_err());
        assert!(CollectionName::parse("").is_err());
        assert!(CollectionName::parse("a b").is_err());
    }
}
