use std::sync::Mutex;

use crate::{
    providers::{
        GenerationError, GenerationFuture, GenerationProvider, ToolFuture, ToolInvocationError,
        ToolProvider,
    },
    work::AnnotationValue,
};

/// Deterministic tool provider for stage tests.
///
/// Payloads containing `FAIL` make every tool fail, `bad` reads as
/// negative sentiment.
pub struct ScriptedTools {
    names: Vec<&'static str>,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedTools {
    pub fn new(names: &[&'static str]) -> Self {
        Self {
            names: names.to_vec(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl ToolProvider for ScriptedTools {
    fn supports(&self, tool_name: &str) -> bool {
        self.names.contains(&tool_name)
    }

    fn invoke<'a>(&'a self, payload: &'a str, tool_name: &'a str) -> ToolFuture<'a> {
        self.calls
            .lock()
            .unwrap()
            .push((payload.to_string(), tool_name.to_string()));
        Box::pin(async move {
            if payload.contains("FAIL") {
                return Err(ToolInvocationError::ExecutionFailed(format!("{tool_name} crashed")));
            }
            match tool_name {
                "sentiment" if payload.contains("bad") => Ok(AnnotationValue::from("negative")),
                "sentiment" => Ok(AnnotationValue::from("positive")),
                "tags" => Ok(AnnotationValue::List(
                    payload.split_whitespace().take(2).map(String::from).collect(),
                )),
                other => Ok(AnnotationValue::Text(format!("{other}:{payload}"))),
            }
        })
    }
}

/// Echoes the prompt, or fails for payloads containing `MUTE`.
pub struct EchoGenerator;

impl GenerationProvider for EchoGenerator {
    fn generate<'a>(&'a self, payload: &'a str, prompt: &'a str) -> GenerationFuture<'a> {
        Box::pin(async move {
            if payload.contains("MUTE") {
                return Err(GenerationError::EmptyResponse);
            }
            Ok(format!("{prompt} ({} chars)", payload.len()))
        })
    }
}
