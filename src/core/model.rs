// BizDirectory - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// =============================================================================
// Raw stored document (input of normalisation)
// =============================================================================

/// A document exactly as the store returned it: its store-assigned id plus
/// a free-form mapping of field name to value.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    /// Store-assigned identity. Stable and unique within a collection.
    pub id: String,

    /// Field name to stored value. Field presence and types are not trusted.
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl RawDocument {
    pub fn new(id: impl Into<String>, fields: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Build a document from a JSON value. Non-object values yield an empty
    /// field map.
    pub fn from_value(id: impl Into<String>, value: serde_json::Value) -> Self {
        let fields = match value {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        Self::new(id, fields)
    }
}

// =============================================================================
// Record (canonical output of normalisation)
// =============================================================================

/// One directory entry, normalised from a stored document.
///
/// This is the unit that flows through filtering, projection, and export.
/// Records are never mutated after normalisation; every store snapshot
/// replaces the whole list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub id: String,
    pub name: String,
    pub email: String,
    pub info: String,
    pub contact: String,

    /// Decimal degrees. `None` when the stored value is absent or not numeric.
    pub latitude: Option<f64>,
    /// Decimal degrees. `None` when the stored value is absent or not numeric.
    pub longitude: Option<f64>,

    /// Facet value.
    pub business_type: String,
    /// Facet value.
    pub industry_sector: String,

    pub website: String,

    /// Stored organisation size, kept in its stored JSON type.
    pub organization_size: OrganizationSize,

    pub availability: String,
    pub additional_notes: String,
    pub image_url: Option<String>,

    /// Trimmed, non-empty, de-duplicated tags in first-occurrence order.
    pub tags: Vec<String>,

    /// Resolved server timestamp. Timestamp sorting uses this instant.
    pub created_at: DateTime<Utc>,

    /// Locale display string computed from `created_at` at normalisation time.
    pub timestamp: String,
}

// =============================================================================
// Organisation size
// =============================================================================

/// Organisation size exactly as stored: a number, a numeric-looking string,
/// or anything else the write path produced.
///
/// Used as a numeric sort key through [`OrganizationSize::numeric`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganizationSize(pub serde_json::Value);

impl OrganizationSize {
    /// Numeric coercion used by the size comparators.
    ///
    /// JSON numbers are used directly. Strings are trimmed and parsed as
    /// `f64`; empty strings, unparseable strings, non-finite results, and
    /// every other JSON type are non-numeric (`None`).
    pub fn numeric(&self) -> Option<f64> {
        match &self.0 {
            serde_json::Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
            serde_json::Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
            }
            _ => None,
        }
    }

    /// Verbatim textual form: strings as-is, numbers as serde_json renders
    /// them, null as empty.
    pub fn display(&self) -> String {
        match &self.0 {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Ascending comparison: numeric values by value, all non-numeric
    /// values after every numeric one and equal to each other.
    pub fn cmp_asc(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    /// Descending comparison. Non-numeric values still sort last.
    pub fn cmp_desc(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => b.total_cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl From<&str> for OrganizationSize {
    fn from(s: &str) -> Self {
        Self(serde_json::Value::String(s.to_string()))
    }
}

impl From<i64> for OrganizationSize {
    fn from(n: i64) -> Self {
        Self(serde_json::Value::from(n))
    }
}

// =============================================================================
// Record fields (table columns and report fields)
// =============================================================================

/// The seven listing fields shared by the table view, the structured export,
/// and the report. Declaration order is the default column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordField {
    Name,
    BusinessType,
    Info,
    IndustrySector,
    OrganizationSize,
    Timestamp,
    Tags,
}

impl RecordField {
    /// All fields in default column order.
    pub fn all() -> &'static [RecordField] {
        &[
            RecordField::Name,
            RecordField::BusinessType,
            RecordField::Info,
            RecordField::IndustrySector,
            RecordField::OrganizationSize,
            RecordField::Timestamp,
            RecordField::Tags,
        ]
    }

    /// Human-readable column header.
    pub fn label(&self) -> &'static str {
        match self {
            RecordField::Name => "Name",
            RecordField::BusinessType => "Business Type",
            RecordField::Info => "Info",
            RecordField::IndustrySector => "Industry Sector",
            RecordField::OrganizationSize => "Organization Size",
            RecordField::Timestamp => "Timestamp",
            RecordField::Tags => "Tags",
        }
    }

    /// Stored field key, as used in raw documents.
    pub fn key(&self) -> &'static str {
        match self {
            RecordField::Name => "name",
            RecordField::BusinessType => "businessType",
            RecordField::Info => "info",
            RecordField::IndustrySector => "industrySector",
            RecordField::OrganizationSize => "organizationSize",
            RecordField::Timestamp => "timestamp",
            RecordField::Tags => "tags",
        }
    }

    /// Parse a field from its stored key (case-insensitive).
    pub fn from_key(key: &str) -> Option<RecordField> {
        Self::all()
            .iter()
            .copied()
            .find(|f| f.key().eq_ignore_ascii_case(key.trim()))
    }

    /// Verbatim cell value of this field for `record`.
    pub fn cell(&self, record: &Record) -> String {
        match self {
            RecordField::Name => record.name.clone(),
            RecordField::BusinessType => record.business_type.clone(),
            RecordField::Info => record.info.clone(),
            RecordField::IndustrySector => record.industry_sector.clone(),
            RecordField::OrganizationSize => record.organization_size.display(),
            RecordField::Timestamp => record.timestamp.clone(),
            RecordField::Tags => record.tags.join(crate::util::constants::TAG_JOINER),
        }
    }
}

impl std::fmt::Display for RecordField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Display mode
// =============================================================================

/// How the filtered view list is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Card,
    Table,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Card => DisplayMode::Table,
            DisplayMode::Table => DisplayMode::Card,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DisplayMode::Card => "Card View",
            DisplayMode::Table => "Table View",
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use chrono::TimeZone;

    /// Build a record with the listing fields set and everything else blank.
    pub fn record(id: &str, name: &str, info: &str, tags: &[&str]) -> Record {
        Record {
            id: id.to_string(),
            name: name.to_string(),
            email: String::new(),
            info: info.to_string(),
            contact: String::new(),
            latitude: None,
            longitude: None,
            business_type: String::new(),
            industry_sector: String::new(),
            website: String::new(),
            organization_size: OrganizationSize::default(),
            availability: String::new(),
            additional_notes: String::new(),
            image_url: None,
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            timestamp: "1/1/2024, 12:00:00 AM".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_organization_size_numeric_coercion() {
        assert_eq!(OrganizationSize(json!(250)).numeric(), Some(250.0));
        assert_eq!(OrganizationSize(json!(" 12.5 ")).numeric(), Some(12.5));
        assert_eq!(OrganizationSize(json!("")).numeric(), None);
        assert_eq!(OrganizationSize(json!("large")).numeric(), None);
        assert_eq!(OrganizationSize(json!("inf")).numeric(), None);
        assert_eq!(OrganizationSize(json!(null)).numeric(), None);
        assert_eq!(OrganizationSize(json!(true)).numeric(), None);
    }

    #[test]
    fn test_non_numeric_sizes_sort_last_both_directions() {
        let small = OrganizationSize::from(5);
        let big = OrganizationSize::from("50");
        let junk = OrganizationSize::from("n/a");
        assert_eq!(small.cmp_asc(&big), Ordering::Less);
        assert_eq!(junk.cmp_asc(&big), Ordering::Greater);
        assert_eq!(big.cmp_desc(&small), Ordering::Less);
        assert_eq!(junk.cmp_desc(&small), Ordering::Greater);
        assert_eq!(junk.cmp_desc(&OrganizationSize::default()), Ordering::Equal);
    }

    #[test]
    fn test_organization_size_display_is_verbatim() {
        assert_eq!(OrganizationSize(json!(42)).display(), "42");
        assert_eq!(OrganizationSize(json!("10-50")).display(), "10-50");
        assert_eq!(OrganizationSize(json!(null)).display(), "");
    }

    #[test]
    fn test_record_field_from_key() {
        for field in RecordField::all() {
            assert_eq!(RecordField::from_key(field.key()), Some(*field));
        }
        assert_eq!(RecordField::from_key("BUSINESSTYPE"), Some(RecordField::BusinessType));
        assert_eq!(RecordField::from_key("email"), None);
    }

    #[test]
    fn test_tags_cell_joined() {
        let r = test_support::record("1", "Acme", "", &["x", "y"]);
        assert_eq!(RecordField::Tags.cell(&r), "x, y");
    }
}
