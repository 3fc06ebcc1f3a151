pub mod datetime;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod reminders;

pub use error::LedgerError;
pub use identity::{resolve, Directory};
pub use ledger::{Ledger, LedgerConfig};
pub use reminders::{Notifier, ReminderScheduler, ScanOutcome};
