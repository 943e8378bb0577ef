//! Multi-step annotation workflows over retrieved passages.
//!
//! A run loads passages into a [`WorkQueue`], tags every one of them with a
//! first tool, selects the items whose tag matches a condition, runs more
//! tools and a generated answer on that subset, and renders a [`Report`]
//! alongside an [`ActivityLog`] of every call made.
//!
//! Tools and text generation are injected as [`ToolProvider`] and
//! [`GenerationProvider`] implementations: [`ToolSet`] / [`FnGenerator`]
//! for in-process closures, [`services::ollama`] for models served by
//! Ollama.

pub mod activity;
pub mod config;
pub mod notifications;
pub mod observability;
pub mod pipeline;
pub mod providers;
pub mod services;
pub mod templates;
pub mod work;

pub use activity::{ActivityLog, ActivityRecord, ActivityStage, Outcome};
pub use config::{ConfigError, PipelineConfig};
pub use notifications::{Notification, NotificationContent, NotificationHandler};
pub use observability::logging::init_default_tracing;
pub use pipeline::{
    annotate_all, build_report, run, run_followups, select, Pipeline, PipelineBuildError,
    PipelineBuilder, PipelineError, PipelineStage, Report, ReportEntry, ReportField, ReportValue,
};
pub use providers::{
    AsyncGenerateFn, AsyncToolFn, FnGenerator, GenerationError, GenerationFuture,
    GenerationProvider, ToolFuture, ToolInvocationError, ToolProvider, ToolSet,
};
pub use templates::{Template, TemplateDataSource};
pub use work::{AnnotationValue, ItemId, LoadError, QueueError, WorkItem, WorkQueue};
