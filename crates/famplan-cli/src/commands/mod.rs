mod members;
pub use members::*;

mod plan;
pub use plan::*;

mod reminders;
pub use reminders::*;
