//! Providers backed by a local Ollama server.

mod client;
mod client_config;
mod errors;
mod function_call;
mod generate;
mod generator;

pub use client::OllamaClient;
pub use client_config::{ClientConfig, DEFAULT_BASE_URL};
pub use errors::ModelClientError;
pub use function_call::{parse_function_response, FunctionTool, OllamaToolProvider};
pub use generate::{GenerateOptions, GenerateRequest, GenerateResponse};
pub use generator::{OllamaGenerator, DEFAULT_ANSWER_TEMPLATE};
