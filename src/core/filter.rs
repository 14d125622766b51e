// BizDirectory - core/filter.rs
//
// Filter/sort pipeline for directory records.
// All active filters are AND-combined; sorting runs after filtering.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::Record;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Pipeline sort keys. `None` in [`FilterState::sort_key`] keeps upstream order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    OrganizationSizeAsc,
    OrganizationSizeDesc,
    TimestampAsc,
    TimestampDesc,
    NameAsc,
    NameDesc,
}

impl SortKey {
    /// All variants in menu order.
    pub fn all() -> &'static [SortKey] {
        &[
            SortKey::OrganizationSizeAsc,
            SortKey::OrganizationSizeDesc,
            SortKey::TimestampDesc,
            SortKey::TimestampAsc,
            SortKey::NameAsc,
            SortKey::NameDesc,
        ]
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::OrganizationSizeAsc => "Organization Size (Ascending)",
            SortKey::OrganizationSizeDesc => "Organization Size (Descending)",
            SortKey::TimestampDesc => "Most Recent",
            SortKey::TimestampAsc => "Oldest",
            SortKey::NameAsc => "Name (A-Z)",
            SortKey::NameDesc => "Name (Z-A)",
        }
    }

    /// Stable identifier (`nameAsc`, `timestampDesc`, ...).
    pub fn key(&self) -> &'static str {
        match self {
            SortKey::OrganizationSizeAsc => "organizationSizeAsc",
            SortKey::OrganizationSizeDesc => "organizationSizeDesc",
            SortKey::TimestampAsc => "timestampAsc",
            SortKey::TimestampDesc => "timestampDesc",
            SortKey::NameAsc => "nameAsc",
            SortKey::NameDesc => "nameDesc",
        }
    }

    /// Parse from the stable identifier (case-insensitive).
    pub fn from_key(key: &str) -> Option<SortKey> {
        Self::all()
            .iter()
            .copied()
            .find(|k| k.key().eq_ignore_ascii_case(key.trim()))
    }

    /// Compare two records under this key.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        match self {
            SortKey::OrganizationSizeAsc => a.organization_size.cmp_asc(&b.organization_size),
            SortKey::OrganizationSizeDesc => a.organization_size.cmp_desc(&b.organization_size),
            SortKey::TimestampAsc => a.created_at.cmp(&b.created_at),
            SortKey::TimestampDesc => b.created_at.cmp(&a.created_at),
            SortKey::NameAsc => compare_text(&a.name, &b.name),
            SortKey::NameDesc => compare_text(&b.name, &a.name),
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Complete filter and sort state. Filters are AND-combined.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// Substring search over name, info, and tags (case-insensitive).
    /// Surrounding whitespace is ignored. Empty = no filter.
    pub search_term: String,

    /// Business types to include (empty = all).
    pub business_types: HashSet<String>,

    /// Industry sectors to include (empty = all).
    pub industry_sectors: HashSet<String>,

    /// Sort applied after filtering. None = upstream order.
    pub sort_key: Option<SortKey>,
}

impl FilterState {
    /// Returns true if no filters are active (sorting is not a filter).
    pub fn is_empty(&self) -> bool {
        self.search_term.trim().is_empty()
            && self.business_types.is_empty()
            && self.industry_sectors.is_empty()
    }
}

/// Apply filters and sort to a record slice, returning indices of matching
/// records in view order.
///
/// Returns indices into the original slice rather than copies, so the
/// snapshot stays the single owner of record data.
pub fn apply_filters(records: &[Record], filter: &FilterState) -> Vec<usize> {
    let mut indices: Vec<usize> = if filter.is_empty() {
        (0..records.len()).collect()
    } else {
        let term = filter.search_term.trim().to_lowercase();
        records
            .iter()
            .enumerate()
            .filter(|(_, record)| matches_all(record, filter, &term))
            .map(|(idx, _)| idx)
            .collect()
    };

    if let Some(key) = filter.sort_key {
        // sort_by is stable: ties keep upstream relative order.
        indices.sort_by(|&a, &b| key.compare(&records[a], &records[b]));
    }

    indices
}

/// Resolve view-order indices back to record references.
pub fn filtered_records<'a>(records: &'a [Record], indices: &[usize]) -> Vec<&'a Record> {
    indices.iter().filter_map(|&i| records.get(i)).collect()
}

/// Check if a single record matches all active filters.
/// `term` must already be trimmed and lowercased.
fn matches_all(record: &Record, filter: &FilterState, term: &str) -> bool {
    if !filter.business_types.is_empty() && !filter.business_types.contains(&record.business_type)
    {
        return false;
    }

    if !filter.industry_sectors.is_empty()
        && !filter.industry_sectors.contains(&record.industry_sector)
    {
        return false;
    }

    matches_search(record, term)
}

/// Case-insensitive containment in name, info, or at least one tag.
pub fn matches_search(record: &Record, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    record.name.to_lowercase().contains(term)
        || record.info.to_lowercase().contains(term)
        || record.tags.iter().any(|tag| tag.to_lowercase().contains(term))
}

/// Case-folded text comparison with an exact-comparison tie-break, giving a
/// total order.
///
/// Not collation-aware: after lowercasing, strings order by Unicode
/// codepoint, so accented initials ("Émile") sort after every ASCII letter.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::test_support::record;
    use crate::core::model::OrganizationSize;
    use chrono::{Duration, TimeZone, Utc};

    fn names(records: &[Record], indices: &[usize]) -> Vec<String> {
        indices.iter().map(|&i| records[i].name.clone()).collect()
    }

    fn faceted(id: &str, name: &str, business: &str, sector: &str) -> Record {
        let mut r = record(id, name, "", &[]);
        r.business_type = business.to_string();
        r.industry_sector = sector.to_string();
        r
    }

    fn sample() -> Vec<Record> {
        vec![
            record("1", "Acme", "Widgets galore", &["x", "y"]),
            record("2", "Zenith", "Optics", &["z"]),
        ]
    }

    #[test]
    fn test_empty_filter_returns_upstream_order() {
        let records = sample();
        assert_eq!(apply_filters(&records, &FilterState::default()), vec![0, 1]);
    }

    #[test]
    fn test_search_matches_tag_substring() {
        let records = sample();
        let filter = FilterState {
            search_term: "y".to_string(),
            ..Default::default()
        };
        assert_eq!(names(&records, &apply_filters(&records, &filter)), vec!["Acme"]);
    }

    #[test]
    fn test_search_case_insensitive_and_trimmed() {
        let records = sample();
        let filter = FilterState {
            search_term: "  OPTIC ".to_string(),
            ..Default::default()
        };
        assert_eq!(names(&records, &apply_filters(&records, &filter)), vec!["Zenith"]);
    }

    #[test]
    fn test_search_is_containment_not_equality_on_tags() {
        let records = vec![record("1", "A", "", &["Organic Food"])];
        let filter = FilterState {
            search_term: "organic".to_string(),
            ..Default::default()
        };
        assert_eq!(apply_filters(&records, &filter), vec![0]);
    }

    #[test]
    fn test_facets_and_combined() {
        let records = vec![
            faceted("1", "A", "Retail", "Food"),
            faceted("2", "B", "Retail", "Tech"),
            faceted("3", "C", "Wholesale", "Food"),
        ];
        let filter = FilterState {
            business_types: HashSet::from(["Retail".to_string()]),
            industry_sectors: HashSet::from(["Food".to_string()]),
            ..Default::default()
        };
        assert_eq!(names(&records, &apply_filters(&records, &filter)), vec!["A"]);

        let filter = FilterState {
            business_types: HashSet::from(["Retail".to_string(), "Wholesale".to_string()]),
            ..Default::default()
        };
        assert_eq!(apply_filters(&records, &filter), vec![0, 1, 2]);
    }

    #[test]
    fn test_name_desc_on_unfiltered_set() {
        let records = sample();
        let filter = FilterState {
            sort_key: Some(SortKey::NameDesc),
            ..Default::default()
        };
        assert_eq!(
            names(&records, &apply_filters(&records, &filter)),
            vec!["Zenith", "Acme"]
        );
    }

    #[test]
    fn test_name_asc_and_desc_are_reversed_without_ties() {
        let records = vec![
            record("1", "delta", "", &[]),
            record("2", "Alpha", "", &[]),
            record("3", "charlie", "", &[]),
            record("4", "Bravo", "", &[]),
        ];
        let asc = apply_filters(
            &records,
            &FilterState {
                sort_key: Some(SortKey::NameAsc),
                ..Default::default()
            },
        );
        let mut desc = apply_filters(
            &records,
            &FilterState {
                sort_key: Some(SortKey::NameDesc),
                ..Default::default()
            },
        );
        assert_eq!(names(&records, &asc), vec!["Alpha", "Bravo", "charlie", "delta"]);
        desc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn test_organization_size_sort_non_numeric_last() {
        let mut records = vec![
            record("1", "big", "", &[]),
            record("2", "unknown", "", &[]),
            record("3", "small", "", &[]),
            record("4", "blank", "", &[]),
        ];
        records[0].organization_size = OrganizationSize::from("500");
        records[1].organization_size = OrganizationSize::from("lots");
        records[2].organization_size = OrganizationSize::from(10);
        records[3].organization_size = OrganizationSize::from("");

        let asc = FilterState {
            sort_key: Some(SortKey::OrganizationSizeAsc),
            ..Default::default()
        };
        assert_eq!(
            names(&records, &apply_filters(&records, &asc)),
            vec!["small", "big", "unknown", "blank"]
        );

        let desc = FilterState {
            sort_key: Some(SortKey::OrganizationSizeDesc),
            ..Default::default()
        };
        assert_eq!(
            names(&records, &apply_filters(&records, &desc)),
            vec!["big", "small", "unknown", "blank"]
        );
    }

    #[test]
    fn test_timestamp_sort_uses_instant() {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let mut records = vec![
            record("1", "middle", "", &[]),
            record("2", "newest", "", &[]),
            record("3", "oldest", "", &[]),
        ];
        records[0].created_at = base;
        records[1].created_at = base + Duration::days(30);
        records[2].created_at = base - Duration::days(30);
        // Display strings deliberately sort differently from the instants.
        records[1].timestamp = "1/1/2000".to_string();

        let filter = FilterState {
            sort_key: Some(SortKey::TimestampDesc),
            ..Default::default()
        };
        assert_eq!(
            names(&records, &apply_filters(&records, &filter)),
            vec!["newest", "middle", "oldest"]
        );
    }

    #[test]
    fn test_ties_keep_upstream_order() {
        let records = vec![
            record("1", "Same", "first", &[]),
            record("2", "Same", "second", &[]),
            record("3", "Same", "third", &[]),
        ];
        for key in [SortKey::NameAsc, SortKey::NameDesc, SortKey::TimestampDesc] {
            let filter = FilterState {
                sort_key: Some(key),
                ..Default::default()
            };
            assert_eq!(apply_filters(&records, &filter), vec![0, 1, 2], "{key:?}");
        }
    }

    #[test]
    fn test_pipeline_is_pure() {
        let records = sample();
        let filter = FilterState {
            search_term: "e".to_string(),
            sort_key: Some(SortKey::NameDesc),
            ..Default::default()
        };
        let before = records.clone();
        let first = apply_filters(&records, &filter);
        let second = apply_filters(&records, &filter);
        assert_eq!(first, second);
        assert_eq!(records, before);
    }

    #[test]
    fn test_every_match_appears_exactly_once() {
        let records = vec![
            record("1", "Northwind", "", &["tea"]),
            record("2", "Contoso", "northern branch", &[]),
            record("3", "Fabrikam", "", &["NORTH"]),
            record("4", "Litware", "", &["south"]),
        ];
        let filter = FilterState {
            search_term: "north".to_string(),
            ..Default::default()
        };
        let out = apply_filters(&records, &filter);
        let expected: Vec<usize> = (0..records.len())
            .filter(|&i| matches_search(&records[i], "north"))
            .collect();
        assert_eq!(out, expected);
        assert_eq!(out, vec![0, 1, 2]);
    }

    #[test]
    fn test_compare_text_orders_by_codepoint_after_folding() {
        assert_eq!(compare_text("acme", "ACME Two"), Ordering::Less);
        assert_eq!(compare_text("acme", "Acme"), Ordering::Greater);
        assert_eq!(compare_text("Zenith", "\u{c9}mile"), Ordering::Less);
    }

    #[test]
    fn test_sort_key_from_key() {
        assert_eq!(SortKey::from_key("nameDesc"), Some(SortKey::NameDesc));
        assert_eq!(SortKey::from_key("TIMESTAMPASC"), Some(SortKey::TimestampAsc));
        assert_eq!(SortKey::from_key("size"), None);
    }
}
