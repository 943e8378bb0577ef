use crate::{config::ConfigError, work::QueueError};

/// Caller-misuse errors that abort the current call.
///
/// Failures of external providers never surface here; they are recorded
/// per item in the activity log instead.
#[derive(Debug)]
pub enum PipelineError {
    /// An index outside the queue was requested.
    Queue(QueueError),
    /// A tool name has no binding in the tool provider.
    UnknownTool(String),
    /// The run configuration is unusable.
    Config(ConfigError),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Queue(e) => write!(f, "Queue error: {e}"),
            PipelineError::UnknownTool(name) => write!(f, "No provider binding for tool '{name}'"),
            PipelineError::Config(e) => write!(f, "Config error: {e}"),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Queue(e) => Some(e),
            PipelineError::UnknownTool(_) => None,
            PipelineError::Config(e) => Some(e),
        }
    }
}

impl From<QueueError> for PipelineError {
    fn from(err: QueueError) -> Self {
        PipelineError::Queue(err)
    }
}

impl From<ConfigError> for PipelineError {
    fn from(err: ConfigError) -> Self {
        PipelineError::Config(err)
    }
}

/// Errors that can occur while building a [`Pipeline`](super::Pipeline).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineBuildError {
    QueueNotSet,
    ToolProviderNotSet,
    GenerationProviderNotSet,
}

impl std::fmt::Display for PipelineBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineBuildError::QueueNotSet => write!(f, "Work queue not set."),
            PipelineBuildError::ToolProviderNotSet => write!(f, "Tool provider not set."),
            PipelineBuildError::GenerationProviderNotSet => write!(f, "Generation provider not set."),
        }
    }
}

impl std::error::Error for PipelineBuildError {}
