pub mod storage;
pub mod types;

pub use storage::{
    entries_path, load_entries, load_recovery, recovery_path, save_entries, save_recovery,
};
pub use types::{
    DailyEntry, Dated, DatedStore, EntryLog, EntryNotes, RecoveryBook, RecoveryItem, RecoveryLog,
    RecoveryStatus,
};
