//! Confirmation prompts consumed before destructive operations.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOption {
    Affirm,
    DestructiveAffirm,
    Cancel,
}

impl ConfirmOption {
    pub fn is_affirmative(self) -> bool {
        matches!(self, ConfirmOption::Affirm | ConfirmOption::DestructiveAffirm)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: String,
    pub message: String,
    pub options: Vec<ConfirmOption>,
}

impl ConfirmPrompt {
    pub fn destructive(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            options: vec![ConfirmOption::Cancel, ConfirmOption::DestructiveAffirm],
        }
    }

    pub fn yes_no(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            options: vec![ConfirmOption::Cancel, ConfirmOption::Affirm],
        }
    }
}

/// Presents a prompt and returns the option the user picked.
#[async_trait]
pub trait ConfirmationProvider: Send + Sync {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> ConfirmOption;
}

/// Affirms everything with the first affirmative option offered.
pub struct AutoConfirm;

#[async_trait]
impl ConfirmationProvider for AutoConfirm {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> ConfirmOption {
        prompt
            .options
            .iter()
            .copied()
            .find(|option| option.is_affirmative())
            .unwrap_or(ConfirmOption::Cancel)
    }
}

/// Replays a fixed list of answers and records the prompts it was shown.
/// Once the answers run out every prompt is cancelled.
#[derive(Default)]
pub struct ScriptedConfirm {
    answers: Mutex<VecDeque<ConfirmOption>>,
    seen: Mutex<Vec<ConfirmPrompt>>,
}

impl ScriptedConfirm {
    pub fn new(answers: impl IntoIterator<Item = ConfirmOption>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, answer: ConfirmOption) {
        self.answers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(answer);
    }

    pub fn prompts(&self) -> Vec<ConfirmPrompt> {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl ConfirmationProvider for ScriptedConfirm {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> ConfirmOption {
        self.seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(prompt.clone());
        self.answers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or(ConfirmOption::Cancel)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteAllState {
    Idle,
    AwaitingFirstConfirm,
    AwaitingSecondConfirm,
    Committed,
    Cancelled,
}

/// Two-step confirmation for wiping the whole list.
///
/// `start` → first prompt; affirming → second "irreversible" prompt;
/// affirming again → `Committed`. Cancelling at either step → `Cancelled`.
#[derive(Debug, Clone)]
pub struct DeleteAllFlow {
    state: DeleteAllState,
    task_count: usize,
}

impl Default for DeleteAllFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl DeleteAllFlow {
    pub fn new() -> Self {
        Self {
            state: DeleteAllState::Idle,
            task_count: 0,
        }
    }

    pub fn state(&self) -> DeleteAllState {
        self.state
    }

    /// Begins the flow and returns the first prompt. `None` unless idle.
    pub fn start(&mut self, task_count: usize) -> Option<ConfirmPrompt> {
        if self.state != DeleteAllState::Idle {
            return None;
        }
        self.task_count = task_count;
        self.state = DeleteAllState::AwaitingFirstConfirm;
        Some(ConfirmPrompt::destructive(
            "Delete All Tasks",
            format!("This will delete all {}.", tasks_noun(task_count)),
        ))
    }

    /// Feeds the user's answer; returns the next prompt if one is due.
    pub fn answer(&mut self, choice: ConfirmOption) -> Option<ConfirmPrompt> {
        match (self.state, choice.is_affirmative()) {
            (DeleteAllState::AwaitingFirstConfirm, true) => {
                self.state = DeleteAllState::AwaitingSecondConfirm;
                Some(ConfirmPrompt::destructive(
                    "Are you absolutely sure?",
                    format!(
                        "All {} will be permanently removed. This cannot be undone.",
                        tasks_noun(self.task_count)
                    ),
                ))
            }
            (DeleteAllState::AwaitingSecondConfirm, true) => {
                self.state = DeleteAllState::Committed;
                None
            }
            (DeleteAllState::AwaitingFirstConfirm | DeleteAllState::AwaitingSecondConfirm, false) => {
                self.state = DeleteAllState::Cancelled;
                None
            }
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.state = DeleteAllState::Idle;
        self.task_count = 0;
    }

    /// Drives the whole flow through `provider`; true when committed.
    pub async fn run(&mut self, provider: &dyn ConfirmationProvider, task_count: usize) -> bool {
        let mut next = self.start(task_count);
        while let Some(prompt) = next {
            let choice = provider.confirm(&prompt).await;
            next = self.answer(choice);
        }
        self.state == DeleteAllState::Committed
    }
}

fn tasks_noun(count: usize) -> String {
    format!("{} task{}", count, if count == 1 { "" } else { "s" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_commits_after_two_affirmations() {
        let mut flow = DeleteAllFlow::new();
        assert_eq!(flow.state(), DeleteAllState::Idle);

        let first = flow.start(3).unwrap();
        assert!(first.message.contains("3 tasks"));
        assert_eq!(flow.state(), DeleteAllState::AwaitingFirstConfirm);

        let second = flow.answer(ConfirmOption::DestructiveAffirm).unwrap();
        assert!(second.message.contains("cannot be undone"));
        assert_eq!(flow.state(), DeleteAllState::AwaitingSecondConfirm);

        assert!(flow.answer(ConfirmOption::DestructiveAffirm).is_none());
        assert_eq!(flow.state(), DeleteAllState::Committed);
    }

    #[test]
    fn test_flow_cancel_at_either_step() {
        let mut flow = DeleteAllFlow::new();
        flow.start(2);
        assert!(flow.answer(ConfirmOption::Cancel).is_none());
        assert_eq!(flow.state(), DeleteAllState::Cancelled);

        flow.reset();
        flow.start(2);
        flow.answer(ConfirmOption::Affirm);
        assert!(flow.answer(ConfirmOption::Cancel).is_none());
        assert_eq!(flow.state(), DeleteAllState::Cancelled);

        flow.reset();
        assert_eq!(flow.state(), DeleteAllState::Idle);
    }

    #[test]
    fn test_single_task_prompts_use_singular() {
        let mut flow = DeleteAllFlow::new();
        let first = flow.start(1).unwrap();
        assert_eq!(first.message, "This will delete all 1 task.");

        let second = flow.answer(ConfirmOption::Affirm).unwrap();
        assert!(second.message.starts_with("All 1 task will be permanently removed."));
    }

    #[test]
    fn test_start_ignored_unless_idle() {
        let mut flow = DeleteAllFlow::new();
        flow.start(1);
        assert!(flow.start(1).is_none());
        assert_eq!(flow.state(), DeleteAllState::AwaitingFirstConfirm);
    }

    #[test]
    fn test_answers_after_terminal_state_are_ignored() {
        let mut flow = DeleteAllFlow::new();
        flow.start(1);
        flow.answer(ConfirmOption::Cancel);
        assert!(flow.answer(ConfirmOption::Affirm).is_none());
        assert_eq!(flow.state(), DeleteAllState::Cancelled);
    }

    #[tokio::test]
    async fn test_run_with_scripted_answers() {
        let provider = ScriptedConfirm::new([ConfirmOption::Affirm, ConfirmOption::Affirm]);
        let mut flow = DeleteAllFlow::new();
        assert!(flow.run(&provider, 4).await);
        assert_eq!(provider.prompts().len(), 2);

        let provider = ScriptedConfirm::new([ConfirmOption::Affirm, ConfirmOption::Cancel]);
        let mut flow = DeleteAllFlow::new();
        assert!(!flow.run(&provider, 4).await);
        assert_eq!(flow.state(), DeleteAllState::Cancelled);
    }

    #[tokio::test]
    async fn test_auto_confirm_picks_affirmative() {
        let prompt = ConfirmPrompt::destructive("t", "m");
        assert_eq!(
            AutoConfirm.confirm(&prompt).await,
            ConfirmOption::DestructiveAffirm
        );
    }
}
