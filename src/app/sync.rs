// BizDirectory - app/sync.rs
//
// Live collection synchroniser: keeps the in-memory record list equal to
// the latest store snapshot.
//
// Architecture:
//   - `Synchronizer` lives on the UI thread and is the only writer of the
//     record list. Store callbacks run wherever the store delivers them and
//     only forward `SyncMessage`s over an mpsc channel.
//   - The UI thread drains the channel each frame within a message budget.
//   - Every snapshot replaces the list wholesale.
//   - `stop` releases the subscription and drops the receiver, so nothing
//     queued after teardown is ever applied.

use crate::core::model::{RawDocument, Record};
use crate::core::normalize::normalize_all;
use crate::platform::store::{DocumentStore, Subscription};
use crate::util::error::StoreError;
use std::sync::mpsc;

/// Message forwarded from store callbacks to the UI thread.
#[derive(Debug)]
pub enum SyncMessage {
    Snapshot(Vec<RawDocument>),
    Error(StoreError),
}

/// Outcome of one `poll` call.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncPoll {
    /// Snapshots applied during this poll.
    pub snapshots: usize,
    /// Documents dropped during normalisation across those snapshots.
    pub skipped: usize,
    /// Store error messages received.
    pub errors: Vec<String>,
}

impl SyncPoll {
    pub fn changed(&self) -> bool {
        self.snapshots > 0
    }
}

/// Owner of the in-memory record list.
pub struct Synchronizer {
    records: Vec<Record>,
    loading: bool,
    collection: Option<String>,
    rx: Option<mpsc::Receiver<SyncMessage>>,
    subscription: Option<Subscription>,
}

impl Synchronizer {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            loading: false,
            collection: None,
            rx: None,
            subscription: None,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// True from `start` until the first snapshot is applied.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    /// Subscribe to `collection`, replacing any previous subscription.
    pub fn start(&mut self, store: &dyn DocumentStore, collection: &str) {
        self.stop();

        let (tx, rx) = mpsc::channel();
        let err_tx = tx.clone();
        self.rx = Some(rx);
        self.loading = true;
        self.collection = Some(collection.to_string());

        // Sends fail only once the receiver is gone, which means the view
        // was torn down; dropping the message is the correct outcome.
        let subscription = store.subscribe(
            collection,
            Box::new(move |docs| {
                let _ = tx.send(SyncMessage::Snapshot(docs));
            }),
            Box::new(move |e| {
                let _ = err_tx.send(SyncMessage::Error(e));
            }),
        );
        self.subscription = Some(subscription);
        tracing::info!(collection, "Synchroniser started");
    }

    /// Release the subscription. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            tracing::debug!(collection = ?self.collection, "Synchroniser stopped");
        }
        self.rx = None;
        self.loading = false;
    }

    /// Drain at most `max` pending messages without blocking.
    pub fn poll(&mut self, max: usize) -> SyncPoll {
        let mut result = SyncPoll::default();
        let Some(rx) = &self.rx else {
            return result;
        };

        let mut messages = Vec::with_capacity(max.min(8));
        let mut disconnected = false;
        while messages.len() < max {
            match rx.try_recv() {
                Ok(msg) => messages.push(msg),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }

        for msg in messages {
            match msg {
                SyncMessage::Snapshot(docs) => {
                    let batch = normalize_all(&docs);
                    result.skipped += batch.skipped.len();
                    result.snapshots += 1;
                    self.records = batch.records;
                    self.loading = false;
                    tracing::debug!(
                        records = self.records.len(),
                        skipped = batch.skipped.len(),
                        "Snapshot applied"
                    );
                }
                SyncMessage::Error(e) => {
                    // Keep the last good list.
                    tracing::warn!(error = %e, "Store subscription error");
                    result.errors.push(e.to_string());
                }
            }
        }

        if disconnected {
            tracing::debug!("Store subscription channel closed");
            self.rx = None;
        }
        result
    }

    /// Drop one record after the store confirmed its deletion.
    pub fn remove_record(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.records.len() != before
    }
}

impl Default for Synchronizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Synchronizer {
    fn drop(&mut self) {
        self.stop();
    }
}
