use super::types::Task;

pub fn find_task<'a>(tasks: &'a [Task], id: &str) -> Option<&'a Task> {
    tasks.iter().find(|task| task.id == id)
}

pub fn find_task_mut<'a>(tasks: &'a mut [Task], id: &str) -> Option<&'a mut Task> {
    tasks.iter_mut().find(|task| task.id == id)
}

/// Resolves a full id or a unique id prefix to the task's full id.
pub fn resolve_id(tasks: &[Task], needle: &str) -> Option<String> {
    if needle.is_empty() {
        return None;
    }
    if let Some(task) = find_task(tasks, needle) {
        return Some(task.id.clone());
    }

    let mut matches = tasks.iter().filter(|task| task.id.starts_with(needle));
    match (matches.next(), matches.next()) {
        (Some(task), None) => Some(task.id.clone()),
        _ => None,
    }
}

/// First 8 characters of an id, for compact display.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}
