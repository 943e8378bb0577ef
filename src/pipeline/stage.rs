use core::fmt;

use serde::{Deserialize, Serialize};

/// Progress marker of a pipeline run.
///
/// Variants are ordered; the marker only ever moves forward.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    #[default]
    Loaded,
    Annotated,
    FollowedUp,
    Reported,
}

impl PipelineStage {
    /// The later of `self` and `next`.
    pub fn advance(self, next: PipelineStage) -> PipelineStage {
        self.max(next)
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Loaded => "LOADED",
            PipelineStage::Annotated => "ANNOTATED",
            PipelineStage::FollowedUp => "FOLLOWED_UP",
            PipelineStage::Reported => "REPORTED",
        };
        f.write_str(name)
    }
}
