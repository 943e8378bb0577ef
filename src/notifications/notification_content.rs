use serde::{Deserialize, Serialize};

use crate::{activity::ActivityRecord, pipeline::PipelineStage};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NotificationContent {
    /// The run's stage marker moved forward.
    StageChanged(PipelineStage),
    /// A record was appended to the activity log.
    Activity(ActivityRecord),
    /// The report was produced; carries the number of entries.
    Done(usize),
}
