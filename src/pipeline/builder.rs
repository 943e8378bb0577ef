use core::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    notifications::Notification,
    providers::{GenerationProvider, ToolProvider},
    work::WorkQueue,
};

use super::{Pipeline, PipelineBuildError};

/// A builder for [`Pipeline`].
///
/// Queue and both providers must be set; everything else is optional.
///
/// ```
/// use std::sync::Arc;
/// use fxflow::{AnnotationValue, FnGenerator, PipelineBuilder, ToolSet, WorkQueue};
///
/// let tools = ToolSet::new().add_tool(
///     "sentiment",
///     Arc::new(|_payload: String| {
///         Box::pin(async move { Ok(AnnotationValue::from("negative")) })
///     }),
/// );
/// let generator = FnGenerator::new(Arc::new(|_payload: String, _prompt: String| {
///     Box::pin(async move { Ok("A short summary.".to_string()) })
/// }));
///
/// let pipeline = PipelineBuilder::default()
///     .set_name("ibm-history")
///     .set_queue(WorkQueue::create(["IBM chose Microsoft for the PC operating system."]))
///     .set_tool_provider(tools)
///     .set_generation_provider(generator)
///     .build()
///     .unwrap();
/// assert_eq!(pipeline.name, "ibm-history");
/// ```
#[derive(Default)]
pub struct PipelineBuilder {
    /// Name used for logging and notifications
    name: Option<String>,
    /// Items the run will own
    queue: Option<WorkQueue>,
    /// Provider resolving tool names to annotations
    tools: Option<Arc<dyn ToolProvider>>,
    /// Provider answering free-text prompts
    generator: Option<Arc<dyn GenerationProvider>>,
    /// Optional mpsc sender for notifications
    notification_channel: Option<mpsc::Sender<Notification>>,
}

impl PipelineBuilder {
    pub fn set_name<T>(mut self, name: T) -> Self
    where
        T: Into<String>,
    {
        self.name = Some(name.into());
        self
    }

    pub fn set_queue(mut self, queue: WorkQueue) -> Self {
        self.queue = Some(queue);
        self
    }

    pub fn set_tool_provider<T>(mut self, tools: T) -> Self
    where
        T: ToolProvider + 'static,
    {
        self.tools = Some(Arc::new(tools));
        self
    }

    /// Use a provider that is shared with other pipelines.
    pub fn set_shared_tool_provider(mut self, tools: Arc<dyn ToolProvider>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn set_generation_provider<G>(mut self, generator: G) -> Self
    where
        G: GenerationProvider + 'static,
    {
        self.generator = Some(Arc::new(generator));
        self
    }

    pub fn set_shared_generation_provider(mut self, generator: Arc<dyn GenerationProvider>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn set_notification_channel(mut self, channel: mpsc::Sender<Notification>) -> Self {
        self.notification_channel = Some(channel);
        self
    }

    /// Build the pipeline together with a fresh notification receiver.
    pub fn build_with_notification(
        mut self,
    ) -> Result<(Pipeline, mpsc::Receiver<Notification>), PipelineBuildError> {
        let (sender, receiver) = mpsc::channel(100);
        self.notification_channel = Some(sender);
        let pipeline = self.build()?;
        Ok((pipeline, receiver))
    }

    pub fn build(self) -> Result<Pipeline, PipelineBuildError> {
        let queue = self.queue.ok_or(PipelineBuildError::QueueNotSet)?;
        let tools = self.tools.ok_or(PipelineBuildError::ToolProviderNotSet)?;
        let generator = self
            .generator
            .ok_or(PipelineBuildError::GenerationProviderNotSet)?;

        let run_id = Uuid::new_v4();
        let name = match self.name {
            Some(n) => n,
            None => format!("Pipeline-{run_id}"),
        };

        Ok(Pipeline::new(
            name,
            run_id,
            queue,
            tools,
            generator,
            self.notification_channel,
        ))
    }
}

impl fmt::Debug for PipelineBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineBuilder")
            .field("name", &self.name)
            .field("queue", &self.queue)
            .field("tools", &self.tools.as_ref().map(|_| "<dyn ToolProvider>"))
            .field("generator", &self.generator.as_ref().map(|_| "<dyn GenerationProvider>"))
            .field("notification_channel", &self.notification_channel)
            .finish()
    }
}
