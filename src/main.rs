use std::{error::Error, path::PathBuf};

use fxflow::{
    init_default_tracing,
    observability::langfuse::{self, LangfuseOptions},
    services::ollama::{ClientConfig, OllamaGenerator, OllamaToolProvider},
    work::{load_json_file, DEFAULT_TEXT_FIELD},
    PipelineBuilder, PipelineConfig,
};

const DEFAULT_WORK_FILE: &str = "demos/passages.json";
const ANSWER_MODEL: &str = "bling-phi-3";

/// Usage: `fxflow [work-file.json] [pipeline-config.json]`
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let public_key = std::env::var("LANGFUSE_PUBLIC_KEY").ok();
    let secret_key = std::env::var("LANGFUSE_SECRET_KEY").ok();
    let host = std::env::var("LANGFUSE_HOST").ok();
    let tracer_provider = match (&public_key, &secret_key) {
        (Some(pk), Some(sk)) => Some(langfuse::init(LangfuseOptions {
            public_key: Some(pk.as_str()),
            secret_key: Some(sk.as_str()),
            host: host.as_deref(),
        })?),
        _ => {
            init_default_tracing();
            None
        }
    };

    let mut args = std::env::args().skip(1);
    let work_file = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_WORK_FILE));
    let config = match args.next() {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };

    let queue = load_json_file(&work_file, DEFAULT_TEXT_FIELD)?;
    let client = ClientConfig::from_env().timeout_secs(120).build()?;
    let tools = OllamaToolProvider::with_slim_tools(client.clone(), config.required_tools());
    let generator = OllamaGenerator::new(client, ANSWER_MODEL);

    let pipeline = PipelineBuilder::default()
        .set_name(work_file.display().to_string())
        .set_queue(queue)
        .set_tool_provider(tools)
        .set_generation_provider(generator)
        .build()?;

    let (report, log) = pipeline.run(&config).await?;

    println!("\nFinal Analysis Report:\n");
    for entry in &report {
        println!("{entry}");
    }

    println!("\nActivity Summary:\n");
    for line in log.summary() {
        println!("{line}");
    }

    if let Some(provider) = tracer_provider {
        provider.shutdown()?;
    }
    Ok(())
}
