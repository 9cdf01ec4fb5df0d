//! Keeps the stored blob in sync with the in-memory collection.
//!
//! The blob is a bare JSON array of task records. Older blobs may lack
//! `createdDate`/`createdAt`/`completed` or carry numeric ids; those are
//! upgraded on load using [`RecordDefaults`].

use super::storage::StorageProvider;
use super::types::{Notice, Task};
use crate::shared::errors::StorageError;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

/// Values substituted for fields missing from older records.
#[derive(Debug, Clone)]
pub struct RecordDefaults {
    pub created_at: String,
    pub created_date: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(id) => id,
            RawId::Integer(id) => id.to_string(),
            RawId::Float(id) => id.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedTask {
    id: Option<RawId>,
    text: String,
    #[serde(default)]
    completed: bool,
    created_at: Option<String>,
    created_date: Option<String>,
}

pub struct PersistenceBridge {
    provider: Arc<dyn StorageProvider>,
    key: String,
}

impl PersistenceBridge {
    pub fn new(provider: Arc<dyn StorageProvider>, key: impl Into<String>) -> Self {
        Self {
            provider,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the collection. An absent blob is an empty collection, not an error.
    pub async fn load(&self, defaults: &RecordDefaults) -> Result<Vec<Task>, StorageError> {
        let Some(blob) = self.provider.get(&self.key).await? else {
            tracing::info!(target: "tasks::storage", key = %self.key, "No stored tasks, starting empty");
            return Ok(Vec::new());
        };

        let tasks = decode_tasks(&blob, defaults)?;
        tracing::info!(
            target: "tasks::storage",
            key = %self.key,
            count = tasks.len(),
            "Loaded tasks"
        );
        Ok(tasks)
    }

    /// Serializes the full collection and replaces the stored blob.
    pub async fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        let blob = serde_json::to_string(tasks)?;
        self.provider.set(&self.key, &blob).await?;
        tracing::debug!(
            target: "tasks::storage",
            key = %self.key,
            count = tasks.len(),
            "Saved tasks"
        );
        Ok(())
    }
}

/// Parses a stored blob, upgrading legacy records.
pub fn decode_tasks(blob: &str, defaults: &RecordDefaults) -> Result<Vec<Task>, StorageError> {
    let records: Vec<PersistedTask> = serde_json::from_str(blob)?;
    let mut seen = HashSet::with_capacity(records.len());
    let mut tasks = Vec::with_capacity(records.len());

    for record in records {
        let text = record.text.trim();
        if text.is_empty() {
            tracing::warn!(target: "tasks::storage", "Dropping stored task with empty text");
            continue;
        }

        let mut id = record.id.map(RawId::into_string).unwrap_or_default();
        if id.is_empty() || seen.contains(&id) {
            let fresh = Uuid::new_v4().to_string();
            tracing::warn!(
                target: "tasks::storage",
                old_id = %id,
                new_id = %fresh,
                "Reassigning missing or duplicate task id"
            );
            id = fresh;
        }
        seen.insert(id.clone());

        tasks.push(Task {
            id,
            text: text.to_string(),
            completed: record.completed,
            created_at: record
                .created_at
                .unwrap_or_else(|| defaults.created_at.clone()),
            created_date: record
                .created_date
                .unwrap_or_else(|| defaults.created_date.clone()),
        });
    }

    Ok(tasks)
}

enum SaveCommand {
    Write(Vec<Task>),
    Flush(oneshot::Sender<()>),
}

/// Serializes writes to the storage key through one background task.
///
/// Snapshots queued while a write is in flight collapse to the newest one,
/// so an older snapshot can never land after a newer one.
#[derive(Clone)]
pub struct SaveQueue {
    tx: mpsc::UnboundedSender<SaveCommand>,
}

impl SaveQueue {
    /// Spawns the writer on the current tokio runtime.
    /// Write failures are reported through `notices`.
    pub fn spawn(bridge: Arc<PersistenceBridge>, notices: mpsc::UnboundedSender<Notice>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(bridge, rx, notices));
        Self { tx }
    }

    pub fn enqueue(&self, snapshot: Vec<Task>) -> Result<(), StorageError> {
        self.tx
            .send(SaveCommand::Write(snapshot))
            .map_err(|_| StorageError::WriterGone)
    }

    /// Resolves once every snapshot enqueued before this call has been written (or failed).
    pub async fn flush(&self) -> Result<(), StorageError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx
            .send(SaveCommand::Flush(ack_tx))
            .map_err(|_| StorageError::WriterGone)?;
        ack_rx.await.map_err(|_| StorageError::WriterGone)
    }
}

async fn run_writer(
    bridge: Arc<PersistenceBridge>,
    mut rx: mpsc::UnboundedReceiver<SaveCommand>,
    notices: mpsc::UnboundedSender<Notice>,
) {
    let mut pending: Option<Vec<Task>> = None;

    while let Some(command) = rx.recv().await {
        let mut acks = Vec::new();
        absorb(command, &mut pending, &mut acks);

        // Drain whatever queued up meanwhile without waiting.
        while let Ok(command) = rx.try_recv() {
            absorb(command, &mut pending, &mut acks);
        }

        if let Some(snapshot) = pending.take() {
            write_snapshot(&bridge, &snapshot, &notices).await;
        }

        for ack in acks {
            let _ = ack.send(());
        }
    }

    tracing::debug!(target: "tasks::storage", "Save queue closed");
}

fn absorb(
    command: SaveCommand,
    pending: &mut Option<Vec<Task>>,
    acks: &mut Vec<oneshot::Sender<()>>,
) {
    match command {
        SaveCommand::Write(snapshot) => {
            if pending.is_some() {
                tracing::trace!(target: "tasks::storage", "Coalescing superseded snapshot");
            }
            *pending = Some(snapshot);
        }
        SaveCommand::Flush(ack) => acks.push(ack),
    }
}

async fn write_snapshot(
    bridge: &PersistenceBridge,
    snapshot: &[Task],
    notices: &mpsc::UnboundedSender<Notice>,
) {
    if let Err(e) = bridge.save(snapshot).await {
        tracing::error!(
            target: "tasks::storage",
            key = %bridge.key(),
            error = %e,
            "Failed to save tasks"
        );
        let _ = notices.send(Notice::error(
            "Save failed",
            format!("Your changes are kept for this session but were not saved: {}", e),
        ));
    }
}
