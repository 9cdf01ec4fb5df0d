use super::errors::ExportError;
use super::summary::compute_stats;
use super::types::{ExportSnapshot, Task};
use async_trait::async_trait;
use chrono::{DateTime, Local, SecondsFormat};
use std::path::PathBuf;

impl ExportSnapshot {
    pub fn build(tasks: &[Task], exported_at: DateTime<Local>) -> Self {
        let stats = compute_stats(tasks);
        Self {
            exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Secs, false),
            total_tasks: stats.total,
            completed_tasks: stats.completed,
            pending_tasks: stats.pending,
            tasks: tasks.to_vec(),
        }
    }
}

/// Receives an export snapshot; returns where it ended up.
#[async_trait]
pub trait ExportSink: Send + Sync {
    async fn deliver(&self, snapshot: &ExportSnapshot) -> Result<String, ExportError>;
}

/// Writes `daylist-export-<timestamp>.json` into a directory.
pub struct FileExportSink {
    dir: PathBuf,
}

impl FileExportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file_name(snapshot: &ExportSnapshot) -> String {
        let stamp = DateTime::parse_from_rfc3339(&snapshot.exported_at)
            .map(|at| at.format("%Y-%m-%d-%H%M%S").to_string())
            .unwrap_or_else(|_| Local::now().format("%Y-%m-%d-%H%M%S").to_string());
        format!("daylist-export-{}.json", stamp)
    }
}

#[async_trait]
impl ExportSink for FileExportSink {
    async fn deliver(&self, snapshot: &ExportSnapshot) -> Result<String, ExportError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.dir.join(Self::file_name(snapshot));
        let content = serde_json::to_string_pretty(snapshot)?;
        tokio::fs::write(&path, content).await?;

        tracing::info!(
            target: "tasks",
            path = %path.display(),
            count = snapshot.total_tasks,
            "Exported tasks"
        );
        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn task(id: &str, completed: bool) -> Task {
        Task {
            id: id.to_string(),
            text: format!("task {}", id),
            completed,
            created_at: "9:00:00 AM".to_string(),
            created_date: "10/19/2026".to_string(),
        }
    }

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 19, 14, 30, 5).single().unwrap()
    }

    #[test]
    fn test_snapshot_counts() {
        let tasks = vec![task("a", true), task("b", false), task("c", false)];
        let snapshot = ExportSnapshot::build(&tasks, at());

        assert_eq!(snapshot.total_tasks, 3);
        assert_eq!(snapshot.completed_tasks, 1);
        assert_eq!(snapshot.pending_tasks, 2);
        assert_eq!(snapshot.tasks, tasks);
        assert!(snapshot.exported_at.starts_with("2026-10-19T14:30:05"));
    }

    #[tokio::test]
    async fn test_file_sink_writes_json() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = FileExportSink::new(tmp.path().join("exports"));
        let snapshot = ExportSnapshot::build(&[task("a", false)], at());

        let location = sink.deliver(&snapshot).await.unwrap();

        assert!(location.ends_with("daylist-export-2026-10-19-143005.json"));
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&location).unwrap()).unwrap();
        assert_eq!(written["totalTasks"], 1);
        assert_eq!(written["pendingTasks"], 1);
        assert_eq!(written["tasks"][0]["text"], "task a");
    }
}
