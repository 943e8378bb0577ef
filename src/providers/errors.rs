/// Failures reported by a [`ToolProvider`](super::ToolProvider).
///
/// The pipeline absorbs these per item: a sentinel is stored and the
/// failure is written to the activity log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolInvocationError {
    /// No binding exists for the requested tool name.
    UnknownTool(String),
    /// The tool ran but failed.
    ExecutionFailed(String),
    /// The tool answered with something that could not be interpreted.
    MalformedResponse(String),
    /// The backing service could not be reached.
    Unavailable(String),
}

impl std::fmt::Display for ToolInvocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolInvocationError::UnknownTool(s) => write!(f, "Unknown tool: {s}"),
            ToolInvocationError::ExecutionFailed(s) => write!(f, "Tool execution failed: {s}"),
            ToolInvocationError::MalformedResponse(s) => write!(f, "Malformed tool response: {s}"),
            ToolInvocationError::Unavailable(s) => write!(f, "Tool unavailable: {s}"),
        }
    }
}

impl std::error::Error for ToolInvocationError {}

/// Failures reported by a [`GenerationProvider`](super::GenerationProvider).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    ExecutionFailed(String),
    /// The model produced no text.
    EmptyResponse,
    Unavailable(String),
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationError::ExecutionFailed(s) => write!(f, "Generation failed: {s}"),
            GenerationError::EmptyResponse => write!(f, "Generation returned no text"),
            GenerationError::Unavailable(s) => write!(f, "Generation unavailable: {s}"),
        }
    }
}

impl std::error::Error for GenerationError {}
