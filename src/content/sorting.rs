//! Ordering of content summaries by `(date, title)`

use chrono::NaiveDateTime;
use serde_yaml::Value;

use super::frontmatter::{parse_date_string, scalar_to_string};
use super::ContentItem;

/// Date component of the sort key; variant order is the sort order
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum DateKey {
    Parsed(NaiveDateTime),
    /// Present but not a recognised date, compared as text
    Unparsed(String),
    /// Absent, null, or not a scalar
    Missing,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum TitleKey {
    Present(String),
    Missing,
}

fn date_key(value: Option<&Value>) -> DateKey {
    match value.and_then(scalar_to_string) {
        Some(s) => match parse_date_string(&s) {
            Some(dt) => DateKey::Parsed(dt),
            None => DateKey::Unparsed(s),
        },
        None => DateKey::Missing,
    }
}

fn title_key(value: Option<&Value>) -> TitleKey {
    match value.and_then(scalar_to_string) {
        Some(s) => TitleKey::Present(s),
        None => TitleKey::Missing,
    }
}

/// Sort items ascending by date, then title, then id.
///
/// Items without a usable date go last, as do items without a title within
/// the same date.
pub fn sort_items(items: &mut [ContentItem]) {
    items.sort_by_cached_key(|item| {
        (
            date_key(item.metadata.get("date")),
            title_key(item.metadata.get("title")),
            item.id.clone(),
        )
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FrontMatter;

    fn item(id: &str, date: Option<&str>, title: Option<&str>) -> ContentItem {
        let mut metadata = FrontMatter::default();
        if let Some(date) = date {
            metadata.insert("date", date);
        }
        if let Some(title) = title {
            metadata.insert("title", title);
        }
        ContentItem::summary(id, metadata)
    }

    fn ids(items: &[ContentItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_sort_by_date_then_title() {
        let mut items = vec![
            item("c", Some("2021-03-01"), Some("Zed")),
            item("b", Some("2021-01-01"), Some("Beta")),
            item("a", Some("2021-01-01"), Some("Alpha")),
        ];
        sort_items(&mut items);
        assert_eq!(ids(&items), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_dates_compare_chronologically() {
        let mut items = vec![
            item("late", Some("2021-01-01 12:00:00"), Some("A")),
            item("early", Some("2021/01/01 09:30"), Some("B")),
            item("offset", Some("2021-01-01T08:00:00+02:00"), Some("C")),
        ];
        sort_items(&mut items);
        // 08:00+02:00 is 06:00 UTC
        assert_eq!(ids(&items), vec!["offset", "early", "late"]);
    }

    #[test]
    fn test_missing_and_unparseable_dates_go_last() {
        let mut items = vec![
            item("none", None, Some("A")),
            item("soon", Some("someday"), Some("A")),
            item("dated", Some("2020-05-05"), Some("Z")),
        ];
        sort_items(&mut items);
        assert_eq!(ids(&items), vec!["dated", "soon", "none"]);
    }

    #[test]
    fn test_missing_title_sorts_after_titles() {
        let mut items = vec![
            item("untitled", Some("2021-01-01"), None),
            item("titled", Some("2021-01-01"), Some("Anything")),
        ];
        sort_items(&mut items);
        assert_eq!(ids(&items), vec!["titled", "untitled"]);
    }

    #[test]
    fn test_full_ties_fall_back_to_id() {
        let mut items = vec![
            item("second", Some("2021-01-01"), Some("Same")),
            item("first", Some("2021-01-01"), Some("Same")),
        ];
        sort_items(&mut items);
        assert_eq!(ids(&items), vec!["first", "second"]);
    }
}
