//! Hardline State - persistent rollback journal

pub mod journal;

pub use journal::{Journal, JournalEntry, JOURNAL_FILE};
