use tracing::{instrument, warn};

use crate::{
    activity::{ActivityLog, ActivityStage, Outcome},
    providers::ToolProvider,
    work::{AnnotationValue, WorkItem, WorkQueue},
};

use super::PipelineError;

/// Apply `tool_name` to every item, in index order.
///
/// Each result is stored under `tool_name`, replacing any previous value.
/// A failing call stores [`AnnotationValue::Empty`] and is logged; it never
/// stops the pass. Only a tool the provider does not know aborts the call,
/// before any item is touched.
#[instrument(level = "debug", skip(queue, log, provider), fields(items = queue.size()))]
pub async fn annotate_all(
    queue: &mut WorkQueue,
    log: &mut ActivityLog,
    provider: &dyn ToolProvider,
    tool_name: &str,
) -> Result<(), PipelineError> {
    if !provider.supports(tool_name) {
        return Err(PipelineError::UnknownTool(tool_name.to_string()));
    }

    for item in queue.all_mut() {
        apply_tool(item, log, provider, tool_name, ActivityStage::Annotation).await;
    }
    Ok(())
}

/// Invoke one tool on one item and record the result.
pub(crate) async fn apply_tool(
    item: &mut WorkItem,
    log: &mut ActivityLog,
    provider: &dyn ToolProvider,
    tool_name: &str,
    stage: ActivityStage,
) {
    let result = provider.invoke(item.payload(), tool_name).await;

    let outcome = match result {
        Ok(value) => {
            item.set_annotation(tool_name, value);
            Outcome::Success
        }
        Err(e) => {
            warn!(item = %item.id(), tool = tool_name, error = %e, "tool invocation failed");
            item.set_annotation(tool_name, AnnotationValue::Empty);
            Outcome::Failure(e.to_string())
        }
    };
    log.append(stage, item.id().clone(), tool_name, outcome);
}
