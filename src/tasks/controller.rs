//! The single view-model that owns the task list for a session.
//!
//! All mutation goes through here: the store is updated synchronously, then
//! the new snapshot is queued for saving. Nothing is saved before the first
//! load has finished.

use super::clock::{Clock, DateFormats};
use super::confirm::{ConfirmPrompt, ConfirmationProvider, DeleteAllFlow};
use super::errors::TaskError;
use super::export::ExportSink;
use super::helpers::find_task;
use super::persistence::{PersistenceBridge, RecordDefaults, SaveQueue};
use super::store::TaskStore;
use super::summary::group_by_date;
use super::types::{DateGroup, ExportSnapshot, Notice, Task, TaskStats};
use crate::shared::errors::StorageError;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Ready,
}

pub struct TaskController {
    store: Option<TaskStore>,
    draft: String,
    notices: Vec<Notice>,
    notice_rx: mpsc::UnboundedReceiver<Notice>,
    bridge: Arc<PersistenceBridge>,
    save_queue: SaveQueue,
    confirm: Arc<dyn ConfirmationProvider>,
    clock: Arc<dyn Clock>,
    formats: DateFormats,
}

impl TaskController {
    /// Must be called inside a tokio runtime; spawns the save queue.
    pub fn new(
        bridge: Arc<PersistenceBridge>,
        confirm: Arc<dyn ConfirmationProvider>,
        clock: Arc<dyn Clock>,
        formats: DateFormats,
    ) -> Self {
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();
        let save_queue = SaveQueue::spawn(bridge.clone(), notice_tx);

        Self {
            store: None,
            draft: String::new(),
            notices: Vec::new(),
            notice_rx,
            bridge,
            save_queue,
            confirm,
            clock,
            formats,
        }
    }

    /// Seeds the store from storage. A failed read falls back to an empty list.
    pub async fn load(&mut self) {
        let now = self.clock.now();
        let defaults = RecordDefaults {
            created_at: self.formats.format_time(&now),
            created_date: self.formats.format_date(now.date_naive()),
        };

        let tasks = match self.bridge.load(&defaults).await {
            Ok(tasks) => tasks,
            Err(e) => {
                tracing::error!(
                    target: "tasks::controller",
                    error = %e,
                    "Failed to load tasks, starting with an empty list"
                );
                self.notices.push(Notice::error(
                    "Could not load tasks",
                    format!("Starting with an empty list: {}", e),
                ));
                Vec::new()
            }
        };

        tracing::info!(target: "tasks::controller", count = tasks.len(), "Task list ready");
        self.store = Some(TaskStore::from_tasks(tasks));
    }

    pub fn view_state(&self) -> ViewState {
        if self.store.is_some() {
            ViewState::Ready
        } else {
            ViewState::Loading
        }
    }

    /// `None` while loading, so an unloaded list is never mistaken for an empty one.
    pub fn tasks(&self) -> Option<&[Task]> {
        self.store.as_ref().map(TaskStore::tasks)
    }

    pub fn stats(&self) -> Option<TaskStats> {
        self.store.as_ref().map(TaskStore::stats)
    }

    pub fn date_groups(&self) -> Option<Vec<DateGroup<'_>>> {
        let today = self.clock.today();
        self.store
            .as_ref()
            .map(|store| group_by_date(store.tasks(), today, &self.formats))
    }

    pub fn formats(&self) -> &DateFormats {
        &self.formats
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Adds the draft as a task; the draft is cleared only on success.
    pub fn submit_draft(&mut self) -> Result<Task, TaskError> {
        let draft = std::mem::take(&mut self.draft);
        match self.add(&draft) {
            Ok(task) => Ok(task),
            Err(e) => {
                self.draft = draft;
                Err(e)
            }
        }
    }

    pub fn add(&mut self, raw_text: &str) -> Result<Task, TaskError> {
        let clock = self.clock.clone();
        let store = self.store.as_mut().ok_or(TaskError::NotReady)?;

        let task = match store.add(raw_text, clock.as_ref(), &self.formats) {
            Ok(task) => task.clone(),
            Err(e) => {
                if matches!(e, TaskError::EmptyText) {
                    self.notices
                        .push(Notice::warning("Empty task", "Please enter a task."));
                }
                return Err(e);
            }
        };

        tracing::debug!(target: "tasks::controller", id = %task.id, "Task added");
        self.persist();
        Ok(task)
    }

    pub fn toggle(&mut self, id: &str) -> Result<bool, TaskError> {
        let store = self.store.as_mut().ok_or(TaskError::NotReady)?;
        let changed = store.toggle(id);
        if changed {
            tracing::debug!(target: "tasks::controller", id = %id, "Task toggled");
            self.persist();
        }
        Ok(changed)
    }

    /// Deletes one task after a single confirmation.
    pub async fn delete(&mut self, id: &str) -> Result<bool, TaskError> {
        let text = {
            let store = self.store.as_ref().ok_or(TaskError::NotReady)?;
            match find_task(store.tasks(), id) {
                Some(task) => task.text.clone(),
                None => return Ok(false),
            }
        };

        let prompt = ConfirmPrompt::destructive(
            "Delete Task",
            format!("Are you sure you want to delete \"{}\"?", text),
        );
        if !self.confirm.confirm(&prompt).await.is_affirmative() {
            tracing::debug!(target: "tasks::controller", id = %id, "Delete cancelled");
            return Ok(false);
        }

        let store = self.store.as_mut().ok_or(TaskError::NotReady)?;
        let changed = store.delete(id);
        if changed {
            tracing::debug!(target: "tasks::controller", id = %id, "Task deleted");
            self.persist();
        }
        Ok(changed)
    }

    /// Clears the list after two confirmations.
    pub async fn delete_all(&mut self) -> Result<bool, TaskError> {
        let count = self.store.as_ref().ok_or(TaskError::NotReady)?.len();
        if count == 0 {
            self.notices
                .push(Notice::info("No tasks", "There are no tasks to delete."));
            return Ok(false);
        }

        let mut flow = DeleteAllFlow::new();
        if !flow.run(self.confirm.as_ref(), count).await {
            tracing::debug!(target: "tasks::controller", state = ?flow.state(), "Delete all cancelled");
            return Ok(false);
        }

        let store = self.store.as_mut().ok_or(TaskError::NotReady)?;
        let changed = store.delete_all();
        if changed {
            tracing::info!(target: "tasks::controller", count = count, "All tasks deleted");
            self.persist();
        }
        Ok(changed)
    }

    pub fn toggle_all_completion(&mut self) -> Result<bool, TaskError> {
        let store = self.store.as_mut().ok_or(TaskError::NotReady)?;
        let changed = store.toggle_all_completion();
        if changed {
            tracing::debug!(target: "tasks::controller", "Toggled completion of all tasks");
            self.persist();
        }
        Ok(changed)
    }

    /// Removes completed tasks after a confirmation naming the count.
    pub async fn clear_completed(&mut self) -> Result<usize, TaskError> {
        let completed = self
            .store
            .as_ref()
            .ok_or(TaskError::NotReady)?
            .completed_count();
        if completed == 0 {
            self.notices.push(Notice::info(
                "Nothing to clear",
                "There are no completed tasks to clear.",
            ));
            return Ok(0);
        }

        let prompt = ConfirmPrompt::destructive(
            "Clear Completed",
            format!(
                "Remove {} completed task{}?",
                completed,
                if completed == 1 { "" } else { "s" }
            ),
        );
        if !self.confirm.confirm(&prompt).await.is_affirmative() {
            return Ok(0);
        }

        let store = self.store.as_mut().ok_or(TaskError::NotReady)?;
        let removed = store.clear_completed();
        if removed > 0 {
            tracing::info!(target: "tasks::controller", removed = removed, "Cleared completed tasks");
            self.persist();
        }
        Ok(removed)
    }

    /// Hands a read-only snapshot to `sink`; returns the sink's location string.
    pub async fn export(&mut self, sink: &dyn ExportSink) -> Result<String, TaskError> {
        let snapshot = {
            let store = self.store.as_ref().ok_or(TaskError::NotReady)?;
            ExportSnapshot::build(store.tasks(), self.clock.now())
        };

        match sink.deliver(&snapshot).await {
            Ok(location) => Ok(location),
            Err(e) => {
                tracing::error!(target: "tasks::controller", error = %e, "Export failed");
                self.notices
                    .push(Notice::error("Export failed", e.to_string()));
                Err(e.into())
            }
        }
    }

    /// Waits until every queued save has been attempted.
    pub async fn flush(&self) -> Result<(), StorageError> {
        self.save_queue.flush().await
    }

    /// Drains pending notices, including save failures reported by the writer.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        while let Ok(notice) = self.notice_rx.try_recv() {
            self.notices.push(notice);
        }
        std::mem::take(&mut self.notices)
    }

    fn persist(&mut self) {
        let Some(store) = self.store.as_ref() else {
            return;
        };

        if let Err(e) = self.save_queue.enqueue(store.tasks().to_vec()) {
            tracing::error!(target: "tasks::controller", error = %e, "Could not queue save");
            self.notices.push(Notice::error("Save failed", e.to_string()));
        }
    }
}
