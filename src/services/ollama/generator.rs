use std::collections::HashMap;

use tracing::instrument;

use super::{
    generate::{GenerateOptions, GenerateRequest},
    OllamaClient,
};
use crate::{
    providers::{GenerationError, GenerationFuture, GenerationProvider},
    templates::Template,
};

/// Prompt layout expected by small fact-based question-answering models.
pub const DEFAULT_ANSWER_TEMPLATE: &str = "<human>: {{context}}\n{{question}}\n<bot>:";

/// Answers a question about a payload with an Ollama-served model.
#[derive(Debug, Clone)]
pub struct OllamaGenerator {
    client: OllamaClient,
    model: String,
    template: Template,
    system: Option<String>,
    temperature: Option<f32>,
    max_output: Option<i32>,
}

impl OllamaGenerator {
    pub fn new(client: OllamaClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            template: Template::simple(DEFAULT_ANSWER_TEMPLATE),
            system: None,
            temperature: Some(0.0),
            max_output: None,
        }
    }

    /// Replace the prompt template; `{{context}}` and `{{question}}` are filled in.
    pub fn with_template(mut self, template: Template) -> Self {
        self.template = template;
        self
    }

    pub fn with_system_prompt(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_output(mut self, max_output: i32) -> Self {
        self.max_output = Some(max_output);
        self
    }

    pub(crate) async fn render_prompt(&self, payload: &str, question: &str) -> String {
        let mut data = HashMap::new();
        data.insert("context".to_string(), payload.to_string());
        data.insert("question".to_string(), question.to_string());
        self.template.compile(&data).await
    }

    #[instrument(level = "debug", skip(self, payload), fields(model = %self.model))]
    async fn answer(&self, payload: &str, question: &str) -> Result<String, GenerationError> {
        let mut req = GenerateRequest::new(self.model.clone(), self.render_prompt(payload, question).await);
        req.system = self.system.clone();
        req.options = Some(GenerateOptions {
            temperature: self.temperature,
            num_predict: self.max_output,
            ..Default::default()
        });

        let resp = self.client.generate(&req).await?;
        let text = resp.response.trim();
        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

impl GenerationProvider for OllamaGenerator {
    fn generate<'a>(&'a self, payload: &'a str, prompt: &'a str) -> GenerationFuture<'a> {
        Box::pin(self.answer(payload, prompt))
    }
}
