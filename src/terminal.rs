//! Terminal front end: stdin confirmations and plain-text rendering.

use crate::tasks::confirm::{ConfirmOption, ConfirmPrompt, ConfirmationProvider};
use crate::tasks::helpers::short_id;
use crate::tasks::types::{DateGroup, Notice, NoticeLevel, Task, TaskStats};
use async_trait::async_trait;
use std::fmt::Write as _;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader, Stdin};
use tokio::sync::Mutex;

/// Asks on stdout, reads the answer from `input`. EOF or anything unrecognised cancels.
///
/// One reader serves every prompt, so answers piped in ahead of time are not
/// lost to a dropped buffer between prompts.
pub struct TerminalConfirm<R = BufReader<Stdin>> {
    input: Mutex<R>,
}

impl TerminalConfirm {
    pub fn new() -> Self {
        Self::with_reader(BufReader::new(tokio::io::stdin()))
    }
}

impl Default for TerminalConfirm {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> TerminalConfirm<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn with_reader(reader: R) -> Self {
        Self {
            input: Mutex::new(reader),
        }
    }
}

#[async_trait]
impl<R> ConfirmationProvider for TerminalConfirm<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn confirm(&self, prompt: &ConfirmPrompt) -> ConfirmOption {
        let question = format!(
            "{}\n{}\n{} ",
            prompt.title,
            prompt.message,
            option_hint(&prompt.options)
        );

        let mut stdout = tokio::io::stdout();
        if stdout.write_all(question.as_bytes()).await.is_err() || stdout.flush().await.is_err() {
            return ConfirmOption::Cancel;
        }

        let mut line = String::new();
        let mut input = self.input.lock().await;
        match input.read_line(&mut line).await {
            Ok(0) | Err(_) => ConfirmOption::Cancel,
            Ok(_) => parse_answer(&line, &prompt.options),
        }
    }
}

fn option_hint(options: &[ConfirmOption]) -> String {
    let labels: Vec<&str> = options
        .iter()
        .map(|option| match option {
            ConfirmOption::Affirm => "[y]es",
            ConfirmOption::DestructiveAffirm => "[d]elete",
            ConfirmOption::Cancel => "[N]o",
        })
        .collect();
    labels.join(" / ")
}

/// Maps a typed answer onto one of the offered options.
pub fn parse_answer(input: &str, options: &[ConfirmOption]) -> ConfirmOption {
    let wanted = match input.trim().to_lowercase().as_str() {
        "y" | "yes" => {
            // "yes" also accepts a destructive-only prompt.
            if options.contains(&ConfirmOption::Affirm) {
                ConfirmOption::Affirm
            } else {
                ConfirmOption::DestructiveAffirm
            }
        }
        "d" | "delete" => ConfirmOption::DestructiveAffirm,
        _ => ConfirmOption::Cancel,
    };

    if options.contains(&wanted) {
        wanted
    } else {
        ConfirmOption::Cancel
    }
}

pub fn render_task(task: &Task) -> String {
    format!(
        "  [{}] {}  {}  ({})",
        if task.completed { "x" } else { " " },
        short_id(&task.id),
        task.text,
        task.created_at
    )
}

pub fn render_stats(stats: &TaskStats) -> String {
    format!(
        "{} total, {} done, {} pending ({}% complete)",
        stats.total, stats.completed, stats.pending, stats.progress_percent
    )
}

pub fn render_groups(groups: &[DateGroup<'_>], stats: &TaskStats) -> String {
    let mut out = String::new();
    if groups.is_empty() {
        out.push_str("No tasks yet. Add your first task!\n");
    }

    for group in groups {
        let _ = writeln!(out, "{} ({})", group.label, group.tasks.len());
        for task in &group.tasks {
            let _ = writeln!(out, "{}", render_task(task));
        }
    }

    let _ = writeln!(out, "{}", render_stats(stats));
    out
}

pub fn render_notice(notice: &Notice) -> String {
    let level = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    };
    format!("{}: {}: {}", level, notice.title, notice.message)
}
