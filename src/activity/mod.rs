mod log;
mod record;

pub use log::ActivityLog;
pub use record::{ActivityRecord, ActivityStage, Outcome};
