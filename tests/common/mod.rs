use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use fxflow::{
    AnnotationValue, GenerationError, GenerationFuture, GenerationProvider, ToolFuture,
    ToolInvocationError, ToolProvider,
};

/// Tool provider answering from a fixed table keyed by `(payload, tool)`.
///
/// Unlisted pairs fail with `ExecutionFailed`.
#[derive(Default)]
pub struct TableTools {
    known: HashSet<String>,
    answers: HashMap<(String, String), AnnotationValue>,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl TableTools {
    pub fn new(tools: &[&str]) -> Self {
        Self {
            known: tools.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn answer(mut self, payload: &str, tool: &str, value: impl Into<AnnotationValue>) -> Self {
        self.answers
            .insert((payload.to_string(), tool.to_string()), value.into());
        self
    }

    pub fn calls_for(&self, payload: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == payload)
            .count()
    }
}

impl ToolProvider for TableTools {
    fn supports(&self, tool_name: &str) -> bool {
        self.known.contains(tool_name)
    }

    fn invoke<'a>(&'a self, payload: &'a str, tool_name: &'a str) -> ToolFuture<'a> {
        self.calls
            .lock()
            .unwrap()
            .push((payload.to_string(), tool_name.to_string()));
        let answer = self
            .answers
            .get(&(payload.to_string(), tool_name.to_string()))
            .cloned();
        Box::pin(async move {
            answer.ok_or_else(|| {
                ToolInvocationError::ExecutionFailed(format!("{tool_name} failed on '{payload}'"))
            })
        })
    }
}

/// Generator returning a canned summary, or failing when built with `failing()`.
pub struct CannedGenerator {
    fail: bool,
}

impl CannedGenerator {
    pub fn ok() -> Self {
        Self { fail: false }
    }

    pub fn failing() -> Self {
        Self { fail: true }
    }
}

impl GenerationProvider for CannedGenerator {
    fn generate<'a>(&'a self, payload: &'a str, _prompt: &'a str) -> GenerationFuture<'a> {
        Box::pin(async move {
            if self.fail {
                return Err(GenerationError::Unavailable("model offline".into()));
            }
            Ok(format!("summary of {payload}"))
        })
    }
}
