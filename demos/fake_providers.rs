use std::{error::Error, sync::Arc};

use fxflow::{
    init_default_tracing, AnnotationValue, FnGenerator, PipelineBuilder, PipelineConfig,
    ToolInvocationError, ToolSet, WorkQueue,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_default_tracing();

    let tools = ToolSet::new()
        .add_tool(
            "sentiment",
            Arc::new(|payload: String| {
                Box::pin(async move {
                    let negative = ["soured", "mistake", "blaming"]
                        .iter()
                        .any(|w| payload.contains(w));
                    Ok(AnnotationValue::from(if negative { "negative" } else { "neutral" }))
                })
            }),
        )
        .add_tool(
            "tags",
            Arc::new(|payload: String| {
                Box::pin(async move {
                    let tags: Vec<String> = payload
                        .split_whitespace()
                        .filter(|w| w.chars().next().is_some_and(char::is_uppercase))
                        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
                        .collect();
                    Ok(AnnotationValue::List(tags))
                })
            }),
        )
        .add_tool(
            "ner",
            Arc::new(|_payload: String| {
                Box::pin(async move {
                    Err(ToolInvocationError::Unavailable("ner model not loaded".into()))
                })
            }),
        );

    let generator = FnGenerator::new(Arc::new(|payload: String, _prompt: String| {
        Box::pin(async move {
            let first_clause = payload.split(',').next().unwrap_or_default().to_string();
            Ok(first_clause)
        })
    }));

    let queue = WorkQueue::create([
        "IBM and Microsoft agreed on a PC operating system in 1980.",
        "Relations soured during OS/2, with each side blaming the other.",
        "Letting Microsoft license MS-DOS was a mistake, analysts say.",
    ]);

    let config = PipelineConfig {
        pass2_tools: vec!["tags".into(), "ner".into()],
        report_keys: vec!["sentiment".into(), "tags".into(), "ner".into(), "summary".into()],
        ..Default::default()
    };

    let pipeline = PipelineBuilder::default()
        .set_name("fake-providers")
        .set_queue(queue)
        .set_tool_provider(tools)
        .set_generation_provider(generator)
        .build()?;

    let (report, log) = pipeline.run(&config).await?;

    println!("{report}");
    for line in log.summary() {
        println!("{line}");
    }
    Ok(())
}
