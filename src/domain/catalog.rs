//! Tag filtering, text search and display ordering for fetched content.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeSet;

use time::OffsetDateTime;

use super::normalize::tag_list;
use super::record::Record;

const NAME_FIELDS: [&str; 2] = ["name", "title"];

/// Anything that can be listed in a filterable card grid.
pub trait Listing {
    /// Name matched against the search query.
    fn display_name(&self) -> &str;

    fn tags(&self) -> Cow<'_, [String]>;
}

impl Listing for Record {
    fn display_name(&self) -> &str {
        self.first_str(&NAME_FIELDS).unwrap_or("")
    }

    fn tags(&self) -> Cow<'_, [String]> {
        Cow::Owned(Record::tags(self))
    }
}

/// Distinct tags across `items`, sorted lexicographically.
pub fn collect_tags<T: Listing>(items: &[T]) -> Vec<String> {
    items
        .iter()
        .flat_map(|item| item.tags().into_owned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Active tag set parsed from a comma-separated query value.
pub fn active_tags(comma_separated: Option<&str>) -> BTreeSet<String> {
    comma_separated.map(tag_list).unwrap_or_default().into_iter().collect()
}

/// An empty active set lets everything through; otherwise any shared tag
/// is enough.
pub fn matches_tags<T: Listing>(item: &T, active: &BTreeSet<String>) -> bool {
    active.is_empty() || item.tags().iter().any(|tag| active.contains(tag))
}

/// Case-insensitive substring match on the display name. A blank query
/// matches everything.
pub fn matches_query<T: Listing>(item: &T, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    item.display_name()
        .to_lowercase()
        .contains(&query.to_lowercase())
}

/// Items passing both the tag filter and the text filter, in input order.
pub fn select<'a, T: Listing>(
    items: &'a [T],
    active: &BTreeSet<String>,
    query: &str,
) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| matches_tags(*item, active) && matches_query(*item, query))
        .collect()
}

/// Most recent first. Items without a usable date go after dated ones and
/// keep their relative order.
pub fn sort_newest_first<T, F>(items: &mut [T], date: F)
where
    F: Fn(&T) -> Option<OffsetDateTime>,
{
    items.sort_by(|a, b| match (date(a), date(b)) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Ascending priority. Equal priorities keep fetch order.
pub fn sort_by_priority<T, F>(items: &mut [T], priority: F)
where
    F: Fn(&T) -> f64,
{
    items.sort_by(|a, b| priority(a).total_cmp(&priority(b)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::normalize::parse_timestamp;
    use crate::domain::record::FieldValue;

    fn record(name: &str, tags: &str) -> Record {
        [
            ("name".to_string(), FieldValue::String(name.to_string())),
            ("tags".to_string(), FieldValue::String(tags.to_string())),
        ]
        .into_iter()
        .collect()
    }

    fn names<'a>(items: &[&'a Record]) -> Vec<&'a str> {
        items.iter().map(|item| item.display_name()).collect()
    }

    #[test]
    fn tag_filter_uses_any_match() {
        let items = vec![record("one", "a"), record("two", "b"), record("three", "a, b")];
        let active = active_tags(Some("a"));

        assert_eq!(names(&select(&items, &active, "")), vec!["one", "three"]);
    }

    #[test]
    fn empty_active_set_passes_everything() {
        let items = vec![record("one", "a"), record("two", "")];
        assert_eq!(select(&items, &BTreeSet::new(), "").len(), 2);
    }

    #[test]
    fn query_is_case_insensitive_and_combined_with_tags() {
        let items = vec![
            record("Cloud Platform", "infra"),
            record("Mobile Banking", "mobile"),
            record("Cloud Billing", "fintech"),
        ];

        let selected = select(&items, &BTreeSet::new(), "cLOUD");
        assert_eq!(names(&selected), vec!["Cloud Platform", "Cloud Billing"]);

        let selected = select(&items, &active_tags(Some("fintech")), "cloud");
        assert_eq!(names(&selected), vec!["Cloud Billing"]);
    }

    #[test]
    fn display_name_falls_back_to_title() {
        let item: Record = [("title".to_string(), FieldValue::String("Atlas".into()))]
            .into_iter()
            .collect();
        assert!(matches_query(&item, "atl"));
        assert!(!matches_query(&Record::default(), "atl"));
        assert!(matches_query(&Record::default(), "  "));
    }

    #[test]
    fn collected_tags_are_distinct_and_sorted() {
        let items = vec![record("x", "web, cloud"), record("y", "ai, web")];
        assert_eq!(collect_tags(&items), vec!["ai", "cloud", "web"]);
    }

    #[test]
    fn newest_first_keeps_undated_items() {
        let mut items = vec![
            ("old", "2023-01-01"),
            ("bad", "not-a-date"),
            ("new", "2024-06-05T00:00:00Z"),
            ("mid", "2023-08-10"),
        ];
        sort_newest_first(&mut items, |(_, date)| parse_timestamp(date));

        let order: Vec<_> = items.iter().map(|(name, _)| *name).collect();
        assert_eq!(order, vec!["new", "mid", "old", "bad"]);
    }

    #[test]
    fn equal_priorities_are_neither_lost_nor_duplicated() {
        let mut items = vec![("b", 1.0), ("a", 0.0), ("c", 1.0), ("d", f64::NAN)];
        sort_by_priority(&mut items, |(_, priority)| *priority);

        let order: Vec<_> = items.iter().map(|(name, _)| *name).collect();
        assert_eq!(order, vec!["a", "b", "c", "d"]);
    }
}
