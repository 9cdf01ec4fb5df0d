pub mod clock;
pub mod confirm;
pub mod controller;
pub mod errors;
pub mod export;
pub mod helpers;
pub mod persistence;
pub mod storage;
pub mod store;
pub mod summary;
pub mod types;

use crate::core::settings::AppSettings;
use clock::{DateFormats, SystemClock};
use confirm::ConfirmationProvider;
use controller::TaskController;
use persistence::PersistenceBridge;
use std::sync::Arc;
use storage::FileStorage;

/// Builds a file-backed controller from settings and loads the stored list.
pub async fn init_controller(
    settings: &AppSettings,
    confirm: Arc<dyn ConfirmationProvider>,
) -> TaskController {
    let data_dir = settings.resolved_data_dir();
    let storage = Arc::new(FileStorage::new(&data_dir));
    let bridge = Arc::new(PersistenceBridge::new(storage, settings.storage_key.clone()));

    let mut controller = TaskController::new(
        bridge,
        confirm,
        Arc::new(SystemClock),
        DateFormats::from_settings(settings),
    );
    controller.load().await;

    tracing::info!(
        target: "tasks",
        path = %data_dir.display(),
        key = %settings.storage_key,
        "Tasks initialized"
    );
    controller
}
