use std::{fmt, time::Duration};

use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client,
};
use serde::de::DeserializeOwned;
use tracing::{error, span, Instrument, Level, Span};
use tracing_opentelemetry::OpenTelemetrySpanExt;

use super::{
    client_config::DEFAULT_BASE_URL,
    generate::{GenerateRequest, GenerateResponse},
    ClientConfig, ModelClientError,
};

/// Minimal client for the Ollama HTTP API.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    pub client: Client,
    pub base_url: String,
}

impl OllamaClient {
    pub fn new(cfg: ClientConfig) -> Result<Self, ModelClientError> {
        let base_url = cfg.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.into());

        let mut headers = HeaderMap::new();
        for (name, value) in cfg.extra_headers.unwrap_or_default() {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ModelClientError::Config(format!("Invalid header name '{name}': {e}")))?;
            let value = HeaderValue::from_str(&value)
                .map_err(|e| ModelClientError::Config(format!("Invalid header value: {e}")))?;
            headers.insert(name, value);
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(secs) = cfg.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    /// Non-streaming completion via `POST /api/generate`.
    pub async fn generate(
        &self,
        req: &GenerateRequest,
    ) -> Result<GenerateResponse, ModelClientError> {
        self.post("/api/generate", req).await
    }

    async fn post<T, R>(&self, endpoint: &str, request_body: &T) -> Result<R, ModelClientError>
    where
        T: serde::Serialize + fmt::Debug,
        R: DeserializeOwned + fmt::Debug,
    {
        let url = format!("{}{}", self.base_url, endpoint);

        let span = span!(
            Level::INFO,
            "Ollama HTTP Request",
            "langfuse.observation.name" = format!("POST {}", endpoint).as_str(),
            "langfuse.observation.type" = "span",
            "http.request.method" = "POST",
            "url.full" = url.as_str(),
            "server.address" = self.base_url.as_str(),
        );

        if let Ok(body) = serde_json::to_string(request_body) {
            span.set_attribute("langfuse.observation.input", body);
        }

        async {
            let response = self
                .client
                .post(&url)
                .json(request_body)
                .send()
                .await
                .map_err(|e| {
                    Span::current().set_status(opentelemetry::trace::Status::Error {
                        description: e.to_string().into(),
                    });
                    ModelClientError::Request(e.to_string())
                })?;

            let status = response.status();

            Span::current().set_attribute("http.response.status_code", status.as_u16() as i64);

            if !status.is_success() {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Failed to read error body".into());

                error!(%status, body = %error_text, "request failed");

                Span::current().set_status(opentelemetry::trace::Status::Error {
                    description: format!("HTTP {}", status).into(),
                });

                return Err(ModelClientError::Api(format!(
                    "Ollama request failed: {status} - {error_text}"
                )));
            }

            let response_text = response.text().await.map_err(|e| {
                ModelClientError::Api(format!("Failed to read response text: {e}"))
            })?;

            Span::current().set_attribute("langfuse.observation.output", response_text.clone());

            serde_json::from_str::<R>(&response_text).map_err(|e| {
                error!(%e, raw = %response_text, "deserialization error");
                Span::current().set_status(opentelemetry::trace::Status::Error {
                    description: "Deserialization Error".into(),
                });
                ModelClientError::Serialization(format!(
                    "Error decoding response body: {e}. Raw JSON was: '{response_text}'"
                ))
            })
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_to_local_server() {
        let client = OllamaClient::new(ClientConfig::default()).unwrap();
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn rejects_invalid_header_names() {
        let mut headers = HashMap::new();
        headers.insert("bad header".to_string(), "x".to_string());

        let err = ClientConfig::default().extra_headers(headers).build().unwrap_err();
        assert!(matches!(err, ModelClientError::Config(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_request_error() {
        let client = ClientConfig::default()
            .base_url("http://127.0.0.1:9")
            .timeout_secs(2)
            .build()
            .unwrap();

        let err = client
            .generate(&GenerateRequest::new("any", "ping"))
            .await
            .unwrap_err();
        assert!(matches!(err, ModelClientError::Request(_)));
    }
}
