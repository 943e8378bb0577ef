mod common;

use std::sync::Arc;

use common::{CannedGenerator, TableTools};
use fxflow::{
    annotate_all, build_report, run, run_followups, select, ActivityLog, AnnotationValue, ItemId,
    Outcome, PipelineBuilder, PipelineConfig, PipelineError, PipelineStage, QueueError,
    ReportValue, WorkQueue,
};

const SUMMARY_PROMPT: &str = "What is a brief summary?";

#[tokio::test]
async fn single_negative_item_is_selected() {
    let mut queue = WorkQueue::create(["IBM walked away from the deal."]);
    let mut log = ActivityLog::new();
    let tools =
        TableTools::new(&["sentiment"]).answer("IBM walked away from the deal.", "sentiment", "negative");

    assert!(queue.get(0).unwrap().annotation("sentiment").is_none());

    annotate_all(&mut queue, &mut log, &tools, "sentiment").await.unwrap();

    assert_eq!(
        queue.get(0).unwrap().annotation("sentiment"),
        Some(&AnnotationValue::from("negative"))
    );
    assert_eq!(select(&queue, "sentiment", "negative"), vec![0]);
}

#[tokio::test]
async fn follow_up_touches_only_the_selected_item() {
    let mut queue = WorkQueue::create(["p0", "p1", "p2"]);
    let mut log = ActivityLog::new();
    let tools = TableTools::new(&["sentiment", "tags"])
        .answer("p0", "sentiment", "positive")
        .answer("p1", "sentiment", "negative")
        .answer("p2", "sentiment", "neutral")
        .answer("p1", "tags", vec!["ibm", "os/2"]);

    annotate_all(&mut queue, &mut log, &tools, "sentiment").await.unwrap();
    let selected = select(&queue, "sentiment", "negative");
    assert_eq!(selected, vec![1]);

    let before: Vec<_> = [0, 2]
        .iter()
        .map(|&i| queue.get(i).unwrap().annotations().clone())
        .collect();

    run_followups(
        &mut queue,
        &mut log,
        &tools,
        &CannedGenerator::ok(),
        &selected,
        &["tags"],
        SUMMARY_PROMPT,
        "summary",
    )
    .await
    .unwrap();

    let item = queue.get(1).unwrap();
    assert_eq!(item.annotation("tags"), Some(&AnnotationValue::from(vec!["ibm", "os/2"])));
    assert_eq!(item.annotation("summary"), Some(&AnnotationValue::from("summary of p1")));

    let after: Vec<_> = [0, 2]
        .iter()
        .map(|&i| queue.get(i).unwrap().annotations().clone())
        .collect();
    assert_eq!(before, after);
    assert_eq!(tools.calls_for("p0"), 1);
    assert_eq!(tools.calls_for("p2"), 1);
}

#[tokio::test]
async fn failing_item_gets_sentinel_and_failure_record() {
    let mut queue = WorkQueue::create(["p0", "p1", "p2"]);
    let mut log = ActivityLog::new();
    let tools = TableTools::new(&["sentiment"])
        .answer("p0", "sentiment", "positive")
        .answer("p1", "sentiment", "negative");

    annotate_all(&mut queue, &mut log, &tools, "sentiment").await.unwrap();

    assert_eq!(queue.get(0).unwrap().annotation("sentiment"), Some(&"positive".into()));
    assert_eq!(queue.get(1).unwrap().annotation("sentiment"), Some(&"negative".into()));
    assert_eq!(queue.get(2).unwrap().annotation("sentiment"), Some(&AnnotationValue::Empty));

    let entries_under_key = queue
        .all()
        .filter(|i| i.annotation("sentiment").is_some())
        .count();
    assert_eq!(entries_under_key, queue.size());

    let failures: Vec<_> = log.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].item_id, ItemId::Index(2));
    assert_eq!(failures[0].action, "sentiment");
    assert!(matches!(failures[0].outcome, Outcome::Failure(_)));
}

#[tokio::test]
async fn empty_selection_flows_through() {
    let mut queue = WorkQueue::create(["p0", "p1"]);
    let mut log = ActivityLog::new();
    let tools = TableTools::new(&["sentiment", "tags"])
        .answer("p0", "sentiment", "positive")
        .answer("p1", "sentiment", "positive");

    annotate_all(&mut queue, &mut log, &tools, "sentiment").await.unwrap();
    let selected = select(&queue, "sentiment", "negative");
    assert!(selected.is_empty());

    let logged = log.len();
    run_followups(
        &mut queue,
        &mut log,
        &tools,
        &CannedGenerator::ok(),
        &selected,
        &["tags"],
        SUMMARY_PROMPT,
        "summary",
    )
    .await
    .unwrap();
    assert_eq!(log.len(), logged);

    let report = build_report(&queue, &selected, &["sentiment", "summary"]).unwrap();
    assert!(report.is_empty());
}

#[tokio::test]
async fn full_run_reports_missing_and_failed_values() {
    let queue = WorkQueue::create(["p0", "p1", "p2"]);
    let tools = TableTools::new(&["sentiment", "tags", "emotions", "topics", "ner"])
        .answer("p0", "sentiment", "negative")
        .answer("p1", "sentiment", "positive")
        .answer("p2", "sentiment", "negative")
        .answer("p0", "tags", vec!["ibm"])
        .answer("p2", "tags", vec!["dos"])
        .answer("p2", "ner", AnnotationValue::from(vec!["Microsoft"]));

    let config = PipelineConfig {
        report_keys: vec!["sentiment".into(), "tags".into(), "ner".into(), "summary".into(), "intent".into()],
        ..Default::default()
    };

    let (report, log) = run(queue, Arc::new(tools), Arc::new(CannedGenerator::failing()), &config)
        .await
        .unwrap();

    let indices: Vec<usize> = report.iter().map(|e| e.index).collect();
    assert_eq!(indices, vec![0, 2]);

    let first = &report.entries[0];
    assert_eq!(first.fields.len(), 5);
    assert_eq!(first.get("tags"), Some(&ReportValue::Present(vec!["ibm"].into())));
    assert_eq!(first.get("ner"), Some(&ReportValue::Present(AnnotationValue::Empty)));
    assert_eq!(first.get("summary"), Some(&ReportValue::Present(AnnotationValue::Empty)));
    assert_eq!(first.get("intent"), Some(&ReportValue::Missing));

    // 3 first-pass calls, then 4 tools + 1 answer for each of the 2 selected items.
    assert_eq!(log.len(), 3 + 2 * 5);
    let answer_failures = log
        .failures()
        .filter(|r| r.action == "answer:summary")
        .count();
    assert_eq!(answer_failures, 2);
}

#[tokio::test]
async fn pipeline_rejects_out_of_range_follow_up() {
    let mut pipeline = PipelineBuilder::default()
        .set_queue(WorkQueue::create(["p0"]))
        .set_tool_provider(TableTools::new(&["tags"]))
        .set_generation_provider(CannedGenerator::ok())
        .build()
        .unwrap();

    let err = pipeline
        .run_followups(&[1], &["tags"], SUMMARY_PROMPT, "summary")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Queue(QueueError::IndexOutOfRange { index: 1, size: 1 })
    ));
    assert_eq!(pipeline.stage(), PipelineStage::Loaded);
    assert!(pipeline.activity_log().is_empty());
}

#[tokio::test]
async fn activity_summary_is_in_recorded_order() {
    let mut pipeline = PipelineBuilder::default()
        .set_queue(WorkQueue::create(["p0", "p1"]))
        .set_tool_provider(
            TableTools::new(&["sentiment"]).answer("p1", "sentiment", "negative"),
        )
        .set_generation_provider(CannedGenerator::ok())
        .build()
        .unwrap();

    pipeline.annotate_all("sentiment").await.unwrap();

    let summary = pipeline.activity_summary();
    assert_eq!(summary.len(), 2);
    assert!(summary[0].starts_with("[0] annotation item=#0 action=sentiment failed:"));
    assert_eq!(summary[1], "[1] annotation item=#1 action=sentiment ok");
    assert_eq!(pipeline.activity_summary(), summary);
}
