//! Capability interfaces the pipeline consumes.
//!
//! Both traits return boxed futures so they can be used as trait objects
//! (`Arc<dyn ToolProvider>`) and swapped for fakes in tests.

mod errors;
mod tool_set;

use std::{future::Future, pin::Pin};

pub use errors::{GenerationError, ToolInvocationError};
pub use tool_set::{AsyncGenerateFn, AsyncToolFn, FnGenerator, ToolSet};

use crate::work::AnnotationValue;

pub type ToolFuture<'a> =
    Pin<Box<dyn Future<Output = Result<AnnotationValue, ToolInvocationError>> + Send + 'a>>;
pub type GenerationFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, GenerationError>> + Send + 'a>>;

/// Computes one annotation type for a payload, selected by name.
pub trait ToolProvider: Send + Sync {
    /// Whether a binding exists for `tool_name`.
    fn supports(&self, tool_name: &str) -> bool;

    fn invoke<'a>(&'a self, payload: &'a str, tool_name: &'a str) -> ToolFuture<'a>;
}

/// Produces free text for a payload and a prompt.
pub trait GenerationProvider: Send + Sync {
    fn generate<'a>(&'a self, payload: &'a str, prompt: &'a str) -> GenerationFuture<'a>;
}
