use std::{collections::HashMap, fmt, future::Future, pin::Pin, sync::Arc};

use super::{
    GenerationError, GenerationFuture, GenerationProvider, ToolFuture, ToolInvocationError,
    ToolProvider,
};
use crate::work::AnnotationValue;

/// Signature for an asynchronous local tool.
///
/// Accepts the item payload and produces an [`AnnotationValue`]
/// or a [`ToolInvocationError`].
pub type AsyncToolFn = Arc<
    dyn Fn(String) -> Pin<Box<dyn Future<Output = Result<AnnotationValue, ToolInvocationError>> + Send>>
        + Send
        + Sync,
>;

/// Signature for an asynchronous generator taking `(payload, prompt)`.
pub type AsyncGenerateFn = Arc<
    dyn Fn(String, String) -> Pin<Box<dyn Future<Output = Result<String, GenerationError>> + Send>>
        + Send
        + Sync,
>;

/// A [`ToolProvider`] backed by named in-process closures.
///
/// ```
/// use std::sync::Arc;
/// use fxflow::{AnnotationValue, ToolSet};
///
/// let tools = ToolSet::new().add_tool(
///     "length",
///     Arc::new(|payload: String| {
///         Box::pin(async move { Ok(AnnotationValue::Text(payload.len().to_string())) })
///     }),
/// );
/// ```
#[derive(Clone, Default)]
pub struct ToolSet {
    tools: HashMap<String, AsyncToolFn>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `executor` under `name`, replacing any previous binding.
    pub fn add_tool<T>(mut self, name: T, executor: AsyncToolFn) -> Self
    where
        T: Into<String>,
    {
        self.tools.insert(name.into(), executor);
        self
    }

    pub fn tool_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl ToolProvider for ToolSet {
    fn supports(&self, tool_name: &str) -> bool {
        self.tools.contains_key(tool_name)
    }

    fn invoke<'a>(&'a self, payload: &'a str, tool_name: &'a str) -> ToolFuture<'a> {
        match self.tools.get(tool_name) {
            Some(executor) => (executor)(payload.to_string()),
            None => Box::pin(async move {
                Err(ToolInvocationError::UnknownTool(tool_name.to_string()))
            }),
        }
    }
}

impl fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolSet")
            .field("tools", &self.tool_names())
            .finish()
    }
}

/// A [`GenerationProvider`] backed by a single closure.
#[derive(Clone)]
pub struct FnGenerator {
    executor: AsyncGenerateFn,
}

impl FnGenerator {
    pub fn new(executor: AsyncGenerateFn) -> Self {
        Self { executor }
    }
}

impl GenerationProvider for FnGenerator {
    fn generate<'a>(&'a self, payload: &'a str, prompt: &'a str) -> GenerationFuture<'a> {
        (self.executor)(payload.to_string(), prompt.to_string())
    }
}

impl fmt::Debug for FnGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnGenerator")
            .field("executor", &"<async_fn>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upper() -> AsyncToolFn {
        Arc::new(|payload: String| {
            Box::pin(async move { Ok(AnnotationValue::Text(payload.to_uppercase())) })
        })
    }

    #[tokio::test]
    async fn invokes_registered_tool() {
        let tools = ToolSet::new().add_tool("upper", upper());

        assert!(tools.supports("upper"));
        assert_eq!(
            tools.invoke("ibm", "upper").await,
            Ok(AnnotationValue::from("IBM"))
        );
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error() {
        let tools = ToolSet::new().add_tool("upper", upper());

        assert!(!tools.supports("sentiment"));
        assert_eq!(
            tools.invoke("ibm", "sentiment").await,
            Err(ToolInvocationError::UnknownTool("sentiment".into()))
        );
    }

    #[tokio::test]
    async fn fn_generator_receives_payload_and_prompt() {
        let generator = FnGenerator::new(Arc::new(|payload: String, prompt: String| {
            Box::pin(async move { Ok(format!("{prompt} -> {payload}")) })
        }));

        assert_eq!(
            generator.generate("text", "summarize").await.unwrap(),
            "summarize -> text"
        );
    }
}
