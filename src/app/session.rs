// BizDirectory - app/session.rs
//
// Session persistence for the admin gate: the toggle, the selected identity,
// and the entered code survive restarts.
//
// Design principles:
// - Persistence is an injected capability (`SessionStore`), not ambient
//   global state; the app state receives one at construction.
// - The file store saves atomically (write temp, rename) so a crash during
//   save never corrupts the previous good session.
// - Load errors are silently discarded: a corrupt or incompatible session
//   just starts the gate disabled.

use crate::core::admin::AdminSession;
use crate::platform::fs::atomic_write;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Version stamp for forward-compatibility checks.
///
/// Version mismatches silently discard the session.
pub const SESSION_VERSION: u32 = 1;

/// Load/save capability for the admin session.
pub trait SessionStore: Send {
    /// `None` means "start fresh".
    fn load(&self) -> Option<AdminSession>;

    /// Returns a descriptive error string suitable for a warn! call.
    fn save(&self, session: &AdminSession) -> Result<(), String>;
}

// =============================================================================
// On-disk data structure
// =============================================================================

/// Complete persistent session snapshot.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionData {
    /// Schema version; must equal `SESSION_VERSION` to be accepted.
    pub version: u32,

    /// Stored under the fixed keys `adminMode`, `selectedAdmin`, `secretCode`.
    #[serde(flatten)]
    pub admin: AdminSession,
}

// =============================================================================
// File-backed store
// =============================================================================

/// JSON session file in the platform data directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<AdminSession> {
        let path = &self.path;
        let content = std::fs::read_to_string(path)
            .map_err(|e| {
                // "Not found" is the normal first run.
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::debug!(path = %path.display(), error = %e, "Cannot read session file");
                }
            })
            .ok()?;

        let data: SessionData = serde_json::from_str(&content)
            .map_err(|e| {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Session file is malformed, starting fresh"
                );
            })
            .ok()?;

        if data.version != SESSION_VERSION {
            tracing::warn!(
                found = data.version,
                expected = SESSION_VERSION,
                "Session file version mismatch, starting fresh"
            );
            return None;
        }

        tracing::info!(path = %path.display(), admin_mode = data.admin.enabled, "Session file loaded");
        Some(data.admin)
    }

    fn save(&self, session: &AdminSession) -> Result<(), String> {
        let data = SessionData {
            version: SESSION_VERSION,
            admin: session.clone(),
        };
        let json = serde_json::to_string_pretty(&data)
            .map_err(|e| format!("failed to serialise session: {e}"))?;

        atomic_write(&self.path, json.as_bytes())
            .map_err(|e| format!("failed to write session file '{}': {e}", self.path.display()))?;

        tracing::debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }
}

// =============================================================================
// In-memory store
// =============================================================================

/// Session store held in memory; clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    slot: Arc<Mutex<Option<AdminSession>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: AdminSession) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(session))),
        }
    }

    /// The last saved session.
    pub fn saved(&self) -> Option<AdminSession> {
        self.slot.lock().ok().and_then(|s| s.clone())
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<AdminSession> {
        self.saved()
    }

    fn save(&self, session: &AdminSession) -> Result<(), String> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| "session slot poisoned".to_string())?;
        *slot = Some(session.clone());
        Ok(())
    }
}

// =============================================================================
// Unit tests
// =============================================================================
