use super::clock::{Clock, DateFormats};
use super::errors::TaskError;
use super::helpers::find_task_mut;
use super::summary::compute_stats;
use super::types::{Task, TaskStats};
use uuid::Uuid;

/// Authoritative, newest-first task collection.
///
/// Mutations take `&mut self`, so no reader can observe a half-applied change.
/// Each operation reports whether the collection changed; callers persist only then.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }

    pub fn stats(&self) -> TaskStats {
        compute_stats(&self.tasks)
    }

    /// Prepends a new task built from the trimmed input.
    pub fn add(
        &mut self,
        raw_text: &str,
        clock: &dyn Clock,
        formats: &DateFormats,
    ) -> Result<&Task, TaskError> {
        let text = raw_text.trim();
        if text.is_empty() {
            return Err(TaskError::EmptyText);
        }

        let now = clock.now();
        let task = Task {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            completed: false,
            created_at: formats.format_time(&now),
            created_date: formats.format_date(now.date_naive()),
        };

        self.tasks.insert(0, task);
        Ok(&self.tasks[0])
    }

    /// Flips `completed` on the matching task. Unknown ids are a no-op.
    pub fn toggle(&mut self, id: &str) -> bool {
        match find_task_mut(&mut self.tasks, id) {
            Some(task) => {
                task.completed = !task.completed;
                true
            }
            None => false,
        }
    }

    /// Removes the matching task. Unknown ids are a no-op.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }

    pub fn delete_all(&mut self) -> bool {
        if self.tasks.is_empty() {
            return false;
        }
        self.tasks.clear();
        true
    }

    /// All completed → all pending; otherwise → all completed.
    pub fn toggle_all_completion(&mut self) -> bool {
        if self.tasks.is_empty() {
            return false;
        }

        let target = !self.tasks.iter().all(|task| task.completed);
        for task in &mut self.tasks {
            task.completed = target;
        }
        true
    }

    /// Removes every completed task, keeping the rest in order. Returns how many went.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.completed);
        before - self.tasks.len()
    }
}
