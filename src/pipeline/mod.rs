//! The annotate → select → follow up → report workflow.
//!
//! Each stage is available as a free function over a [`WorkQueue`](crate::WorkQueue)
//! and an [`ActivityLog`](crate::ActivityLog), and as a method on
//! [`Pipeline`], which owns both for the duration of a run.

mod annotate;
mod builder;
mod error;
mod follow_up;
#[allow(clippy::module_inception)]
mod pipeline;
mod report;
mod select;
mod stage;

#[cfg(test)]
pub(crate) mod fakes;

pub use self::{
    annotate::annotate_all,
    builder::PipelineBuilder,
    error::{PipelineBuildError, PipelineError},
    follow_up::run_followups,
    pipeline::{run, Pipeline},
    report::{build_report, Report, ReportEntry, ReportField, ReportValue},
    select::select,
    stage::PipelineStage,
};
