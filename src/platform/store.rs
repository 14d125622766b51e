// BizDirectory - platform/store.rs
//
// Document store collaborator: fetch, subscribe, delete.
//
// Architecture:
//   - `DocumentStore` is the seam the app layer talks to. Snapshots are
//     always complete collections; there are no partial change sets.
//   - `FileStore` keeps one directory per collection and one `<id>.json`
//     file per document. `subscribe` runs a background poll thread that
//     re-fingerprints the collection (names, sizes, mtimes) and delivers a
//     full snapshot whenever the fingerprint changes.
//   - An `Arc<AtomicBool>` cancel flag stops the poll thread; the sleep is
//     split into STORE_CANCEL_CHECK_INTERVAL_MS slices so cancel is prompt.
//   - `MemoryStore` is an in-process store that notifies subscribers
//     synchronously after every mutation.

use crate::core::model::RawDocument;
use crate::platform::fs;
use crate::util::constants::{
    DOCUMENT_FILE_PATTERN, MAX_DOCUMENT_SIZE_BYTES, STORE_CANCEL_CHECK_INTERVAL_MS,
    STORE_POLL_INTERVAL_MS,
};
use crate::util::error::StoreError;
use glob::Pattern;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime};

/// Receives every complete snapshot of a subscribed collection.
pub type SnapshotCallback = Box<dyn FnMut(Vec<RawDocument>) + Send>;

/// Receives non-fatal store errors for a subscribed collection.
pub type ErrorCallback = Box<dyn FnMut(StoreError) + Send>;

/// The store primitives the directory listing consumes.
pub trait DocumentStore: Send {
    /// Read the whole collection once.
    fn fetch(&self, collection: &str) -> Result<Vec<RawDocument>, StoreError>;

    /// Deliver a snapshot now and after every change until the returned
    /// guard is released.
    fn subscribe(
        &self,
        collection: &str,
        on_snapshot: SnapshotCallback,
        on_error: ErrorCallback,
    ) -> Subscription;

    fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

// =============================================================================
// Subscription guard
// =============================================================================

/// Live subscription handle. Releasing it (explicitly or by drop) runs the
/// store's release action exactly once.
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    /// Stop receiving snapshots.
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Reject ids that are empty or could escape the collection directory.
pub fn validate_id(id: &str) -> Result<(), StoreError> {
    if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\']) {
        return Err(StoreError::InvalidId { id: id.to_string() });
    }
    Ok(())
}

// =============================================================================
// FileStore
// =============================================================================

/// Directory-backed store: `<root>/<collection>/<id>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    poll_interval: Duration,
}

/// Change-detection key for one document file.
type FileStamp = (String, u64, Option<SystemTime>);

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            poll_interval: Duration::from_millis(STORE_POLL_INTERVAL_MS),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, collection: &str) -> Result<PathBuf, StoreError> {
        validate_id(collection)?;
        Ok(self.root.join(collection))
    }

    /// Write (or replace) one document atomically.
    pub fn write_document(
        &self,
        collection: &str,
        id: &str,
        value: &serde_json::Value,
    ) -> Result<PathBuf, StoreError> {
        validate_id(id)?;
        let path = self.collection_dir(collection)?.join(format!("{id}.json"));
        let json = serde_json::to_vec_pretty(value).map_err(|e| StoreError::Malformed {
            path: path.clone(),
            source: e,
        })?;
        fs::atomic_write(&path, &json).map_err(|e| StoreError::Io {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }

    /// Document files of a collection in id order.
    fn document_paths(&self, collection: &str) -> Result<Vec<PathBuf>, StoreError> {
        let dir = self.collection_dir(collection)?;
        if !dir.is_dir() {
            return Err(StoreError::CollectionNotFound {
                collection: collection.to_string(),
            });
        }
        let pattern = Pattern::new(DOCUMENT_FILE_PATTERN).map_err(|e| StoreError::Rejected {
            reason: format!("invalid document pattern: {e}"),
        })?;

        let paths = walkdir::WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            // Per-entry walk errors are non-fatal.
            .flatten()
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.file_name()
                    .to_str()
                    .is_some_and(|name| pattern.matches(name))
            })
            .map(walkdir::DirEntry::into_path)
            .collect();
        Ok(paths)
    }

    fn fingerprint(&self, collection: &str) -> Result<Vec<FileStamp>, StoreError> {
        let stamps = self
            .document_paths(collection)?
            .into_iter()
            .map(|p| {
                let meta = std::fs::metadata(&p).ok();
                (
                    p.to_string_lossy().into_owned(),
                    meta.as_ref().map(|m| m.len()).unwrap_or(0),
                    meta.and_then(|m| m.modified().ok()),
                )
            })
            .collect();
        Ok(stamps)
    }

    /// Read every document, collecting per-document problems separately so
    /// one bad file never hides the rest of the collection.
    fn fetch_with_issues(
        &self,
        collection: &str,
    ) -> Result<(Vec<RawDocument>, Vec<StoreError>), StoreError> {
        let mut docs = Vec::new();
        let mut issues = Vec::new();

        for path in self.document_paths(collection)? {
            let Some(id) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };
            let content = match fs::read_document(&path, MAX_DOCUMENT_SIZE_BYTES) {
                Ok(c) => c,
                Err(e) => {
                    issues.push(e);
                    continue;
                }
            };
            match serde_json::from_str::<serde_json::Value>(&content) {
                Ok(value) => docs.push(RawDocument::from_value(id, value)),
                Err(e) => issues.push(StoreError::Malformed { path, source: e }),
            }
        }
        Ok((docs, issues))
    }
}

impl DocumentStore for FileStore {
    fn fetch(&self, collection: &str) -> Result<Vec<RawDocument>, StoreError> {
        let (docs, issues) = self.fetch_with_issues(collection)?;
        for issue in &issues {
            tracing::warn!(collection, error = %issue, "Skipping unreadable document");
        }
        Ok(docs)
    }

    fn subscribe(
        &self,
        collection: &str,
        on_snapshot: SnapshotCallback,
        on_error: ErrorCallback,
    ) -> Subscription {
        let cancel = Arc::new(AtomicBool::new(false));
        let store = self.clone();
        let collection_owned = collection.to_string();
        let thread_cancel = Arc::clone(&cancel);

        std::thread::spawn(move || {
            run_poll_loop(store, collection_owned, on_snapshot, on_error, thread_cancel);
        });

        tracing::debug!(collection, root = %self.root.display(), "File store subscription started");
        Subscription::new(move || cancel.store(true, Ordering::Relaxed))
    }

    fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        validate_id(id)?;
        let dir = self.collection_dir(collection)?;
        if !dir.is_dir() {
            return Err(StoreError::CollectionNotFound {
                collection: collection.to_string(),
            });
        }
        let path = dir.join(format!("{id}.json"));
        if !path.is_file() {
            return Err(StoreError::DocumentNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        std::fs::remove_file(&path).map_err(|e| StoreError::Io {
            path: path.clone(),
            source: e,
        })?;
        tracing::info!(collection, id, "Document deleted");
        Ok(())
    }
}

/// Background poll thread for one file store subscription.
///
/// Delivers on the first pass and then only when the fingerprint changes, so
/// an unchanged (or persistently missing) collection produces no traffic.
fn run_poll_loop(
    store: FileStore,
    collection: String,
    mut on_snapshot: SnapshotCallback,
    mut on_error: ErrorCallback,
    cancel: Arc<AtomicBool>,
) {
    let cancel_check = Duration::from_millis(STORE_CANCEL_CHECK_INTERVAL_MS);
    let sub_iters: u32 = u32::try_from(
        (store.poll_interval.as_millis() / cancel_check.as_millis()).clamp(1, u32::MAX as u128),
    )
    .unwrap_or(u32::MAX);

    // Outer None = nothing delivered yet; inner Err = collection unreadable.
    let mut last: Option<Result<Vec<FileStamp>, String>> = None;

    loop {
        if cancel.load(Ordering::Relaxed) {
            tracing::debug!(collection = %collection, "Store poll thread: cancel flag set, exiting");
            return;
        }

        let current = store.fingerprint(&collection).map_err(|e| e.to_string());
        if last.as_ref() != Some(&current) {
            match store.fetch_with_issues(&collection) {
                Ok((docs, issues)) => {
                    for issue in issues {
                        on_error(issue);
                    }
                    if cancel.load(Ordering::Relaxed) {
                        return;
                    }
                    tracing::debug!(collection = %collection, documents = docs.len(), "Store snapshot");
                    on_snapshot(docs);
                }
                Err(e) => on_error(e),
            }
            last = Some(current);
        }

        for _ in 0..sub_iters {
            if cancel.load(Ordering::Relaxed) {
                return;
            }
            std::thread::sleep(cancel_check);
        }
    }
}

// =============================================================================
// MemoryStore
// =============================================================================

struct Subscriber {
    id: u64,
    collection: String,
    on_snapshot: SnapshotCallback,
    on_error: ErrorCallback,
}

#[derive(Default)]
struct MemoryInner {
    collections: BTreeMap<String, Vec<RawDocument>>,
    subscribers: Vec<Subscriber>,
    fail_deletes: bool,
}

impl MemoryInner {
    fn snapshot(&self, collection: &str) -> Vec<RawDocument> {
        self.collections.get(collection).cloned().unwrap_or_default()
    }

    fn notify(&mut self, collection: &str) {
        let docs = self.snapshot(collection);
        for sub in self.subscribers.iter_mut().filter(|s| s.collection == collection) {
            (sub.on_snapshot)(docs.clone());
        }
    }
}

/// In-process store. Callbacks run synchronously on the mutating thread and
/// must not call back into the store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
    next_id: Arc<AtomicU64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Insert or replace a document, then notify subscribers.
    pub fn insert(&self, collection: &str, doc: RawDocument) {
        let mut inner = self.lock();
        let docs = inner.collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|d| d.id == doc.id) {
            Some(existing) => *existing = doc,
            None => docs.push(doc),
        }
        inner.notify(collection);
    }

    /// Remove a document without going through the delete primitive.
    pub fn remove(&self, collection: &str, id: &str) -> bool {
        let mut inner = self.lock();
        let removed = inner
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.iter().position(|d| d.id == id).map(|pos| docs.remove(pos)))
            .is_some();
        if removed {
            inner.notify(collection);
        }
        removed
    }

    /// Make every subsequent `delete_document` fail.
    pub fn fail_deletes(&self, fail: bool) {
        self.lock().fail_deletes = fail;
    }

    /// Push an error to every subscriber of `collection`.
    pub fn emit_error(&self, collection: &str, message: &str) {
        let mut inner = self.lock();
        for sub in inner.subscribers.iter_mut().filter(|s| s.collection == collection) {
            (sub.on_error)(StoreError::Rejected {
                reason: message.to_string(),
            });
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }
}

impl DocumentStore for MemoryStore {
    fn fetch(&self, collection: &str) -> Result<Vec<RawDocument>, StoreError> {
        Ok(self.lock().snapshot(collection))
    }

    fn subscribe(
        &self,
        collection: &str,
        mut on_snapshot: SnapshotCallback,
        on_error: ErrorCallback,
    ) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        {
            let mut inner = self.lock();
            on_snapshot(inner.snapshot(collection));
            inner.subscribers.push(Subscriber {
                id,
                collection: collection.to_string(),
                on_snapshot,
                on_error,
            });
        }

        let inner = Arc::clone(&self.inner);
        Subscription::new(move || {
            let mut inner = inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            inner.subscribers.retain(|s| s.id != id);
        })
    }

    fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        validate_id(id)?;
        let mut inner = self.lock();
        if inner.fail_deletes {
            return Err(StoreError::Rejected {
                reason: format!("delete of '{id}' refused"),
            });
        }
        let docs = inner
            .collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::CollectionNotFound {
                collection: collection.to_string(),
            })?;
        let pos = docs
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| StoreError::DocumentNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        docs.remove(pos);
        inner.notify(collection);
        Ok(())
    }
}
