// BizDirectory - core/facets.rs
//
// Facet extraction: distinct business types and industry sectors.
// Always computed from the full collection, never the filtered subset,
// so narrowing the view never removes a selectable option.

use crate::core::model::Record;
use std::collections::HashSet;

/// Distinct facet values in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    pub business_types: Vec<String>,
    pub industry_sectors: Vec<String>,
}

/// Derive facet option sets from `records`.
///
/// A blank value is an option like any other, so records that leave the
/// field empty stay selectable.
pub fn extract_facets(records: &[Record]) -> Facets {
    Facets {
        business_types: distinct(records.iter().map(|r| r.business_type.as_str())),
        industry_sectors: distinct(records.iter().map(|r| r.industry_sector.as_str())),
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}
