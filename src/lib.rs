pub mod core;
pub mod shared;
pub mod tasks;
pub mod terminal;

pub use tasks::controller::{TaskController, ViewState};
pub use tasks::types::{DateGroup, ExportSnapshot, Notice, NoticeLevel, Task, TaskStats};
