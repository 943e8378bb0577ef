use tracing::{debug, instrument, warn};

use crate::{
    activity::{ActivityLog, ActivityStage, Outcome},
    providers::{GenerationProvider, ToolProvider},
    work::{AnnotationValue, WorkQueue},
};

use super::{annotate::apply_tool, PipelineError};

/// Second, narrower pass over the items at `indices`.
///
/// For each index, in the given order, every tool in `tool_names` runs
/// against the item, then `generator` answers `answer_prompt` and the text
/// is stored under `answer_key`. Failures of either kind store
/// [`AnnotationValue::Empty`] and are logged without stopping the pass.
///
/// Indices and tool names are checked before any call is made, so a bad
/// index or an unbound tool leaves the queue untouched.
#[allow(clippy::too_many_arguments)]
#[instrument(level = "debug", skip_all, fields(selected = indices.len(), answer_key = answer_key))]
pub async fn run_followups<S>(
    queue: &mut WorkQueue,
    log: &mut ActivityLog,
    tools: &dyn ToolProvider,
    generator: &dyn GenerationProvider,
    indices: &[usize],
    tool_names: &[S],
    answer_prompt: &str,
    answer_key: &str,
) -> Result<(), PipelineError>
where
    S: AsRef<str>,
{
    queue.check_indices(indices)?;
    if let Some(unknown) = tool_names.iter().find(|t| !tools.supports(t.as_ref())) {
        return Err(PipelineError::UnknownTool(unknown.as_ref().to_string()));
    }

    let answer_action = format!("answer:{answer_key}");
    for &index in indices {
        let item = queue.get_mut(index)?;
        debug!(index, item = %item.id(), "following up");

        for tool_name in tool_names {
            apply_tool(item, log, tools, tool_name.as_ref(), ActivityStage::FollowUp).await;
        }

        let result = generator.generate(item.payload(), answer_prompt).await;
        let outcome = match result {
            Ok(text) => {
                item.set_annotation(answer_key, AnnotationValue::Text(text));
                Outcome::Success
            }
            Err(e) => {
                warn!(item = %item.id(), error = %e, "answer generation failed");
                item.set_annotation(answer_key, AnnotationValue::Empty);
                Outcome::Failure(e.to_string())
            }
        };
        log.append(ActivityStage::FollowUp, item.id().clone(), answer_action.as_str(), outcome);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        pipeline::fakes::{EchoGenerator, ScriptedTools},
        work::QueueError,
    };

    const PROMPT: &str = "What is a brief summary?";

    #[tokio::test]
    async fn only_selected_items_are_touched() {
        let mut queue = WorkQueue::create(["first item", "second item", "third item"]);
        let mut log = ActivityLog::new();
        let tools = ScriptedTools::new(&["tags", "ner"]);

        run_followups(&mut queue, &mut log, &tools, &EchoGenerator, &[1], &["tags", "ner"], PROMPT, "summary")
            .await
            .unwrap();

        let item = queue.get(1).unwrap();
        assert_eq!(item.annotation("tags"), Some(&vec!["second", "item"].into()));
        assert_eq!(item.annotation("ner"), Some(&"ner:second item".into()));
        assert_eq!(
            item.annotation("summary"),
            Some(&"What is a brief summary? (11 chars)".into())
        );
        assert!(queue.get(0).unwrap().annotations().is_empty());
        assert!(queue.get(2).unwrap().annotations().is_empty());

        let actions: Vec<&str> = log.records().iter().map(|r| r.action.as_str()).collect();
        assert_eq!(actions, vec!["tags", "ner", "answer:summary"]);
    }

    #[tokio::test]
    async fn tool_failure_does_not_skip_answer() {
        let mut queue = WorkQueue::create(["FAIL here"]);
        let mut log = ActivityLog::new();
        let tools = ScriptedTools::new(&["tags", "ner"]);

        run_followups(&mut queue, &mut log, &tools, &EchoGenerator, &[0], &["tags", "ner"], PROMPT, "summary")
            .await
            .unwrap();

        let item = queue.get(0).unwrap();
        assert!(item.annotation("tags").unwrap().is_empty());
        assert!(item.annotation("ner").unwrap().is_empty());
        assert!(item.annotation("summary").unwrap().as_text().is_some());
        assert_eq!(log.failures().count(), 2);
        assert_eq!(tools.call_count(), 2);
    }

    #[tokio::test]
    async fn generation_failure_is_recorded() {
        let mut queue = WorkQueue::create(["MUTE passage"]);
        let mut log = ActivityLog::new();
        let tools = ScriptedTools::new(&["tags"]);

        run_followups(&mut queue, &mut log, &tools, &EchoGenerator, &[0], &["tags"], PROMPT, "summary")
            .await
            .unwrap();

        let item = queue.get(0).unwrap();
        assert!(!item.annotation("tags").unwrap().is_empty());
        assert!(item.annotation("summary").unwrap().is_empty());
        let failure = log.failures().next().unwrap();
        assert_eq!(failure.action, "answer:summary");
    }

    #[tokio::test]
    async fn bad_index_fails_without_side_effects() {
        let mut queue = WorkQueue::create(["a", "b"]);
        let mut log = ActivityLog::new();
        let tools = ScriptedTools::new(&["tags"]);

        let err = run_followups(&mut queue, &mut log, &tools, &EchoGenerator, &[0, 2], &["tags"], PROMPT, "summary")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Queue(QueueError::IndexOutOfRange { index: 2, size: 2 })
        ));
        assert_eq!(tools.call_count(), 0);
        assert!(queue.get(0).unwrap().annotations().is_empty());
    }

    #[tokio::test]
    async fn empty_selection_is_a_no_op() {
        let mut queue = WorkQueue::create(["a"]);
        let mut log = ActivityLog::new();
        let tools = ScriptedTools::new(&["tags"]);

        run_followups(&mut queue, &mut log, &tools, &EchoGenerator, &[], &["tags"], PROMPT, "summary")
            .await
            .unwrap();

        assert!(log.is_empty());
        assert_eq!(tools.call_count(), 0);
    }
}
