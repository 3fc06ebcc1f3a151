
// Models
mod identity;
pub use identity::*;

mod members;
pub use members::*;

mod plan_cost;
pub use plan_cost::*;

mod adjustments;
pub use adjustments::*;

mod reminders;
pub use reminders::*;
