use std::{error::Error, sync::Arc};

use fxflow::{
    AnnotationValue, FnGenerator, NotificationContent, PipelineBuilder, PipelineConfig, ToolSet,
    WorkQueue,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let tools = ToolSet::new()
        .add_tool(
            "sentiment",
            Arc::new(|payload: String| {
                Box::pin(async move {
                    let label = if payload.contains("loss") { "negative" } else { "positive" };
                    Ok(AnnotationValue::from(label))
                })
            }),
        )
        .add_tool(
            "topics",
            Arc::new(|_payload: String| {
                Box::pin(async move { Ok(AnnotationValue::from("earnings")) })
            }),
        );
    let generator = FnGenerator::new(Arc::new(|payload: String, _prompt: String| {
        Box::pin(async move { Ok(format!("{} words", payload.split_whitespace().count())) })
    }));

    let (pipeline, mut notifications) = PipelineBuilder::default()
        .set_name("earnings")
        .set_queue(WorkQueue::create([
            "Revenue grew 11% year over year.",
            "Net income fell to a loss of $620 million.",
        ]))
        .set_tool_provider(tools)
        .set_generation_provider(generator)
        .build_with_notification()?;

    let printer = tokio::spawn(async move {
        while let Some(note) = notifications.recv().await {
            match note.content {
                NotificationContent::StageChanged(stage) => println!("[{}] stage -> {stage}", note.pipeline),
                NotificationContent::Activity(record) => println!("[{}] {record}", note.pipeline),
                NotificationContent::Done(entries) => {
                    println!("[{}] done with {entries} report entries", note.pipeline);
                    break;
                }
            }
        }
    });

    let config = PipelineConfig {
        pass2_tools: vec!["topics".into()],
        report_keys: vec!["sentiment".into(), "topics".into(), "summary".into()],
        ..Default::default()
    };
    let (report, _log) = pipeline.run(&config).await?;
    printer.await?;

    println!("{report}");
    Ok(())
}
