use core::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::work::ItemId;

/// Pipeline stage that produced an activity record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStage {
    Annotation,
    FollowUp,
}

impl fmt::Display for ActivityStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityStage::Annotation => f.write_str("annotation"),
            ActivityStage::FollowUp => f.write_str("follow_up"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure(String),
}

/// One stage invocation against one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Position in the log, starting at 0.
    pub seq: u64,
    pub timestamp_millis: u128,
    pub stage: ActivityStage,
    pub item_id: ItemId,
    /// Tool name, or `answer:<key>` for free-text generation.
    pub action: String,
    pub outcome: Outcome,
}

impl ActivityRecord {
    pub(crate) fn new(
        seq: u64,
        stage: ActivityStage,
        item_id: ItemId,
        action: String,
        outcome: Outcome,
    ) -> Self {
        Self {
            seq,
            timestamp_millis: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            stage,
            item_id,
            action,
            outcome,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, Outcome::Failure(_))
    }
}

impl fmt::Display for ActivityRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} item={} action={}",
            self.seq, self.stage, self.item_id, self.action
        )?;
        match &self.outcome {
            Outcome::Success => write!(f, " ok"),
            Outcome::Failure(reason) => write!(f, " failed: {reason}"),
        }
    }
}
