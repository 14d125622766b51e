// BizDirectory - core/normalize.rs
//
// Record normaliser: converts raw stored documents into canonical records.
//
// Only two transformations happen here: the comma-delimited tag string is
// split into a tag set, and the server timestamp is resolved into an
// instant plus a locale display string. Everything else is copied through.
// Core layer: pure logic, no I/O.

use crate::core::model::{OrganizationSize, RawDocument, Record};
use crate::util::constants::{DISPLAY_TIMESTAMP_FORMAT, TAG_SEPARATOR};
use crate::util::error::NormalizeError;
use chrono::{DateTime, Local, TimeZone, Utc};
use serde_json::Value;

/// Stored key of the server-assigned timestamp.
const TIMESTAMP_KEY: &str = "timestamp";

/// Result of normalising one snapshot.
#[derive(Debug, Default)]
pub struct NormalizedBatch {
    /// Successfully normalised records, in snapshot order.
    pub records: Vec<Record>,
    /// Per-record failures. These records are absent from `records`.
    pub skipped: Vec<NormalizeError>,
}

/// Normalise a whole snapshot. One bad document never affects the others.
pub fn normalize_all(docs: &[RawDocument]) -> NormalizedBatch {
    let mut batch = NormalizedBatch {
        records: Vec::with_capacity(docs.len()),
        skipped: Vec::new(),
    };
    for doc in docs {
        match normalize(doc) {
            Ok(record) => batch.records.push(record),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping document during normalisation");
                batch.skipped.push(e);
            }
        }
    }
    batch
}

/// Normalise one stored document.
///
/// Fails only when the document has no resolvable timestamp.
pub fn normalize(doc: &RawDocument) -> Result<Record, NormalizeError> {
    let created_at = resolve_timestamp(&doc.id, doc.fields.get(TIMESTAMP_KEY))?;
    let fields = &doc.fields;

    Ok(Record {
        id: doc.id.clone(),
        name: text(fields, "name"),
        email: text(fields, "email"),
        info: text(fields, "info"),
        contact: text(fields, "contact"),
        latitude: coordinate(fields, "latitude"),
        longitude: coordinate(fields, "longitude"),
        business_type: text(fields, "businessType"),
        industry_sector: text(fields, "industrySector"),
        website: text(fields, "website"),
        organization_size: OrganizationSize(
            fields.get("organizationSize").cloned().unwrap_or(Value::Null),
        ),
        availability: text(fields, "availability"),
        additional_notes: text(fields, "additionalNotes"),
        image_url: optional_text(fields, "img").or_else(|| optional_text(fields, "imageUrl")),
        tags: parse_tags(fields.get("tags").and_then(Value::as_str).unwrap_or("")),
        timestamp: format_display(&created_at),
        created_at,
    })
}

/// Split a comma-delimited tag string into trimmed, non-empty tags.
///
/// Duplicates are dropped; the first occurrence keeps its position.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for piece in raw.split(TAG_SEPARATOR) {
        let tag = piece.trim();
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Resolve a stored server timestamp into an instant.
///
/// Accepted shapes: `{seconds, nanoseconds}` (or the underscored
/// `_seconds`/`_nanoseconds` export form), an RFC 3339 string, or an integer
/// count of epoch milliseconds.
pub fn resolve_timestamp(id: &str, value: Option<&Value>) -> Result<DateTime<Utc>, NormalizeError> {
    let invalid = |raw: &Value| NormalizeError::InvalidTimestamp {
        id: id.to_string(),
        raw: raw.to_string(),
    };

    let value = match value {
        None | Some(Value::Null) => {
            return Err(NormalizeError::MissingTimestamp { id: id.to_string() })
        }
        Some(v) => v,
    };

    match value {
        Value::Object(map) => {
            let seconds = map
                .get("seconds")
                .or_else(|| map.get("_seconds"))
                .and_then(Value::as_i64)
                .ok_or_else(|| invalid(value))?;
            let nanos = map
                .get("nanoseconds")
                .or_else(|| map.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .unwrap_or(0);
            let nanos = u32::try_from(nanos).map_err(|_| invalid(value))?;
            Utc.timestamp_opt(seconds, nanos)
                .single()
                .ok_or_else(|| invalid(value))
        }
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| invalid(value)),
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .ok_or_else(|| invalid(value)),
        _ => Err(invalid(value)),
    }
}

/// Render an instant as the locale display string shown in cards and exports.
pub fn format_display(instant: &DateTime<Utc>) -> String {
    instant
        .with_timezone(&Local)
        .format(DISPLAY_TIMESTAMP_FORMAT)
        .to_string()
}

fn text(fields: &serde_json::Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn optional_text(fields: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn coordinate(fields: &serde_json::Map<String, Value>, key: &str) -> Option<f64> {
    let value = match fields.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let value = value.filter(|v| v.is_finite());
    if value.is_none() {
        tracing::debug!(field = key, "Coordinate is not numeric; leaving unset");
    }
    value
}
