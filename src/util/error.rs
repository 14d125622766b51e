// BizDirectory - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all BizDirectory operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum DirectoryError {
    /// Document store access failed.
    Store(StoreError),

    /// A stored document could not be normalised into a record.
    Normalize(NormalizeError),

    /// Export operation failed.
    Export(ExportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(e) => write!(f, "Store error: {e}"),
            Self::Normalize(e) => write!(f, "Record error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for DirectoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            Self::Normalize(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

/// Errors raised by a document store collaborator.
#[derive(Debug)]
pub enum StoreError {
    /// The collection does not exist in the store.
    CollectionNotFound { collection: String },

    /// The document to operate on does not exist.
    DocumentNotFound { collection: String, id: String },

    /// A document id is unusable (empty, or contains path components).
    InvalidId { id: String },

    /// A stored document exceeds the maximum allowed size.
    DocumentTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// A stored document is not a JSON object.
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The store rejected the operation.
    Rejected { reason: String },

    /// I/O error while reading or writing the store.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CollectionNotFound { collection } => {
                write!(f, "Collection '{collection}' does not exist")
            }
            Self::DocumentNotFound { collection, id } => {
                write!(f, "Document '{id}' not found in collection '{collection}'")
            }
            Self::InvalidId { id } => write!(f, "Invalid document id '{id}'"),
            Self::DocumentTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "Document '{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::Malformed { path, source } => {
                write!(f, "Document '{}' is not valid JSON: {source}", path.display())
            }
            Self::Rejected { reason } => write!(f, "Store rejected operation: {reason}"),
            Self::Io { path, source } => {
                write!(f, "Store I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Malformed { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<StoreError> for DirectoryError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

// ---------------------------------------------------------------------------
// Normalisation errors
// ---------------------------------------------------------------------------

/// Per-record normalisation failures. Fatal to the record, never to the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// The document carries no server timestamp.
    MissingTimestamp { id: String },

    /// The timestamp field is present but cannot be resolved to an instant.
    InvalidTimestamp { id: String, raw: String },
}

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTimestamp { id } => {
                write!(f, "document '{id}' has no timestamp")
            }
            Self::InvalidTimestamp { id, raw } => {
                write!(f, "document '{id}' has an unresolvable timestamp '{raw}'")
            }
        }
    }
}

impl std::error::Error for NormalizeError {}

impl From<NormalizeError> for DirectoryError {
    fn from(e: NormalizeError) -> Self {
        Self::Normalize(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for DirectoryError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for DirectoryError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for BizDirectory results.
pub type Result<T> = std::result::Result<T, DirectoryError>;
