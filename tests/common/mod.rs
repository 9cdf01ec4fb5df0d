use chrono::{DateTime, Local, TimeZone};
use daylist::tasks::clock::{DateFormats, FixedClock};
use daylist::tasks::confirm::ConfirmationProvider;
use daylist::tasks::persistence::PersistenceBridge;
use daylist::tasks::storage::StorageProvider;
use daylist::TaskController;
use std::sync::Arc;

pub fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .expect("unambiguous local time")
}

/// Controller over `storage` with a clock pinned to `clock`. Not loaded yet.
pub fn controller(
    storage: Arc<dyn StorageProvider>,
    confirm: Arc<dyn ConfirmationProvider>,
    clock: Arc<FixedClock>,
) -> TaskController {
    let bridge = Arc::new(PersistenceBridge::new(storage, "tasks"));
    TaskController::new(bridge, confirm, clock, DateFormats::default())
}
