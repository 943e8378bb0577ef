use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use super::{
    generate::{GenerateOptions, GenerateRequest},
    OllamaClient,
};
use crate::{
    providers::{ToolFuture, ToolInvocationError, ToolProvider},
    work::AnnotationValue,
};

/// A small function-calling model bound to one tool name.
///
/// The model is asked `<function> params </function>` about the payload and
/// answers with a dictionary keyed by the params.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionTool {
    pub model: String,
    /// Function tag in the prompt, e.g. `classify` or `extract`.
    pub function: String,
    pub params: Vec<String>,
    #[serde(default)]
    pub max_output: Option<i32>,
}

impl FunctionTool {
    pub fn new(model: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            function: function.into(),
            params: Vec::new(),
            max_output: None,
        }
    }

    pub fn with_params<I, T>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_output(mut self, max_output: i32) -> Self {
        self.max_output = Some(max_output);
        self
    }

    /// Preset for the `slim-<tool>` classifier family.
    pub fn slim(tool: &str) -> Self {
        let params: Vec<&str> = match tool {
            "ner" => vec!["people", "organization", "location"],
            other => vec![other],
        };
        let function = if tool == "ner" { "extract" } else { "classify" };
        FunctionTool::new(format!("slim-{tool}"), function)
            .with_params(params)
            .with_max_output(100)
    }

    pub fn render_prompt(&self, payload: &str) -> String {
        format!(
            "<human>: {payload}\n<{f}> {params} </{f}>\n<bot>:",
            f = self.function,
            params = self.params.join(", ")
        )
    }
}

/// Tool provider that routes each tool name to a [`FunctionTool`] served by Ollama.
#[derive(Debug, Clone)]
pub struct OllamaToolProvider {
    client: OllamaClient,
    tools: HashMap<String, FunctionTool>,
}

impl OllamaToolProvider {
    pub fn new(client: OllamaClient) -> Self {
        Self {
            client,
            tools: HashMap::new(),
        }
    }

    /// Register the slim presets for every name in `tools`.
    pub fn with_slim_tools<I, T>(client: OllamaClient, tools: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        tools.into_iter().fold(Self::new(client), |provider, name| {
            let name = name.as_ref();
            provider.add_tool(name, FunctionTool::slim(name))
        })
    }

    pub fn add_tool(mut self, name: impl Into<String>, tool: FunctionTool) -> Self {
        self.tools.insert(name.into(), tool);
        self
    }

    #[instrument(level = "debug", skip(self, payload, tool), fields(model = %tool.model))]
    async fn call(&self, payload: &str, tool_name: &str, tool: &FunctionTool) -> Result<AnnotationValue, ToolInvocationError> {
        let mut req = GenerateRequest::new(tool.model.clone(), tool.render_prompt(payload));
        req.raw = Some(true);
        req.options = Some(GenerateOptions {
            temperature: Some(0.0),
            num_predict: tool.max_output,
            ..Default::default()
        });

        let resp = self.client.generate(&req).await?;
        debug!(tool = tool_name, response = %resp.response, "function call answered");
        parse_function_response(&resp.response, &tool.params)
    }
}

impl ToolProvider for OllamaToolProvider {
    fn supports(&self, tool_name: &str) -> bool {
        self.tools.contains_key(tool_name)
    }

    fn invoke<'a>(&'a self, payload: &'a str, tool_name: &'a str) -> ToolFuture<'a> {
        Box::pin(async move {
            let tool = self
                .tools
                .get(tool_name)
                .ok_or_else(|| ToolInvocationError::UnknownTool(tool_name.to_string()))?;
            self.call(payload, tool_name, tool).await
        })
    }
}

/// Interpret a function-call reply such as `{'sentiment': ['negative']}`.
///
/// Replies are JSON or Python-literal style dictionaries, where strings may
/// use either quote character.
///
/// With a single param the value under that key is returned, and a
/// one-element list collapses to its string. Otherwise the whole
/// dictionary is returned.
pub fn parse_function_response(
    text: &str,
    params: &[String],
) -> Result<AnnotationValue, ToolInvocationError> {
    let malformed = || ToolInvocationError::MalformedResponse(text.trim().to_string());

    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return Err(malformed());
    };
    if end < start {
        return Err(malformed());
    }
    let body = &text[start..=end];

    let mut dict: Map<String, Value> = serde_json::from_str(body)
        .or_else(|_| json5::from_str(body))
        .map_err(|_| malformed())?;

    if let [param] = params {
        if let Some(value) = dict.remove(param) {
            return Ok(collapse(value));
        }
    }
    Ok(AnnotationValue::from(Value::Object(dict)))
}

fn collapse(value: Value) -> AnnotationValue {
    match value {
        Value::Array(mut items) if items.len() == 1 && items[0].is_string() => {
            AnnotationValue::from(items.remove(0))
        }
        other => AnnotationValue::from(other),
    }
}
