use core::fmt;
use std::sync::Arc;

use tokio::sync::mpsc::Sender;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    activity::ActivityLog,
    config::PipelineConfig,
    notifications::{deliver, Notification, NotificationContent, NotificationHandler},
    providers::{GenerationProvider, ToolProvider},
    work::{AnnotationValue, WorkQueue},
};

use super::{annotate, build_report, follow_up, select, PipelineError, PipelineStage, Report};

/// One annotate → select → follow up → report run over an owned queue.
///
/// The pipeline owns its [`WorkQueue`] and [`ActivityLog`] for the whole
/// run; providers are injected through [`PipelineBuilder`](super::PipelineBuilder).
pub struct Pipeline {
    /// Human-readable name used in logs and notifications.
    pub name: String,
    run_id: Uuid,
    queue: WorkQueue,
    log: ActivityLog,
    stage: PipelineStage,
    tools: Arc<dyn ToolProvider>,
    generator: Arc<dyn GenerationProvider>,
    notification_channel: Option<Sender<Notification>>,
}

impl Pipeline {
    pub(crate) fn new(
        name: String,
        run_id: Uuid,
        queue: WorkQueue,
        tools: Arc<dyn ToolProvider>,
        generator: Arc<dyn GenerationProvider>,
        notification_channel: Option<Sender<Notification>>,
    ) -> Self {
        let mut log = ActivityLog::new();
        if let Some(channel) = &notification_channel {
            let channel = channel.clone();
            let pipeline = name.clone();
            log.set_listener(Arc::new(move |record| {
                deliver(
                    &channel,
                    Notification::new(pipeline.clone(), NotificationContent::Activity(record.clone())),
                );
            }));
        }

        Self {
            name,
            run_id,
            queue,
            log,
            stage: PipelineStage::Loaded,
            tools,
            generator,
            notification_channel,
        }
    }

    /// First pass: apply `tool_name` to every item.
    ///
    /// May be called repeatedly with different tools; earlier annotations
    /// are kept.
    #[instrument(level = "debug", skip(self), fields(pipeline = %self.name))]
    pub async fn annotate_all(&mut self, tool_name: &str) -> Result<(), PipelineError> {
        annotate::annotate_all(&mut self.queue, &mut self.log, self.tools.as_ref(), tool_name)
            .await?;
        self.advance(PipelineStage::Annotated).await;
        Ok(())
    }

    /// Indices of items whose annotation `key` equals `value`.
    pub fn select<V>(&self, key: &str, value: V) -> Vec<usize>
    where
        V: Into<AnnotationValue>,
    {
        select::select(&self.queue, key, value)
    }

    /// Second pass over `indices`: extra tools, then one generated answer.
    #[instrument(level = "debug", skip(self, tool_names, answer_prompt), fields(pipeline = %self.name))]
    pub async fn run_followups<S>(
        &mut self,
        indices: &[usize],
        tool_names: &[S],
        answer_prompt: &str,
        answer_key: &str,
    ) -> Result<(), PipelineError>
    where
        S: AsRef<str>,
    {
        follow_up::run_followups(
            &mut self.queue,
            &mut self.log,
            self.tools.as_ref(),
            self.generator.as_ref(),
            indices,
            tool_names,
            answer_prompt,
            answer_key,
        )
        .await?;
        self.advance(PipelineStage::FollowedUp).await;
        Ok(())
    }

    /// Read-only report over `indices`. See [`build_report`].
    pub fn build_report<S>(&self, indices: &[usize], keys: &[S]) -> Result<Report, PipelineError>
    where
        S: AsRef<str>,
    {
        build_report(&self.queue, indices, keys)
    }

    /// Build the report and mark the run as reported.
    pub async fn finish_report<S>(
        &mut self,
        indices: &[usize],
        keys: &[S],
    ) -> Result<Report, PipelineError>
    where
        S: AsRef<str>,
    {
        let report = build_report(&self.queue, indices, keys)?;
        self.advance(PipelineStage::Reported).await;
        self.notify_done(report.len()).await;
        Ok(report)
    }

    /// Rendered activity log, in recorded order.
    pub fn activity_summary(&self) -> Vec<String> {
        self.log.summary()
    }

    /// Compose both passes and the report as described by `config`.
    ///
    /// Configuration and tool bindings are validated before any provider
    /// is called. Provider failures never abort the run; they show up as
    /// sentinel values in the report and failure records in the log.
    #[instrument(level = "info", skip_all, fields(pipeline = %self.name, run_id = %self.run_id))]
    pub async fn run(
        mut self,
        config: &PipelineConfig,
    ) -> Result<(Report, ActivityLog), PipelineError> {
        config.validate()?;
        if let Some(unknown) = config.required_tools().find(|t| !self.tools.supports(t)) {
            return Err(PipelineError::UnknownTool(unknown.to_string()));
        }

        self.annotate_all(&config.pass1_tool).await?;

        let selected = self.select(&config.filter_key, config.filter_value.clone());
        info!(
            items = self.queue.size(),
            selected = selected.len(),
            key = %config.filter_key,
            value = %config.filter_value,
            "selected items for follow-up"
        );

        self.run_followups(
            &selected,
            &config.pass2_tools,
            &config.answer_prompt,
            &config.answer_key,
        )
        .await?;

        let report = self.finish_report(&selected, &config.report_keys).await?;
        info!(
            entries = report.len(),
            failures = self.log.failures().count(),
            "run complete"
        );
        self.log.clear_listener();
        Ok((report, self.log))
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn queue(&self) -> &WorkQueue {
        &self.queue
    }

    pub fn activity_log(&self) -> &ActivityLog {
        &self.log
    }

    /// Release the queue and log at the end of a run.
    pub fn into_parts(mut self) -> (WorkQueue, ActivityLog) {
        self.log.clear_listener();
        (self.queue, self.log)
    }

    async fn advance(&mut self, next: PipelineStage) {
        let previous = self.stage;
        self.stage = previous.advance(next);
        if self.stage != previous {
            info!(pipeline = %self.name, from = %previous, to = %self.stage, "stage changed");
            self.notify_stage(self.stage).await;
        }
    }
}

/// Run the whole pipeline over `queue` with the given providers.
pub async fn run(
    queue: WorkQueue,
    tools: Arc<dyn ToolProvider>,
    generator: Arc<dyn GenerationProvider>,
    config: &PipelineConfig,
) -> Result<(Report, ActivityLog), PipelineError> {
    let run_id = Uuid::new_v4();
    Pipeline::new(format!("Pipeline-{run_id}"), run_id, queue, tools, generator, None)
        .run(config)
        .await
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("run_id", &self.run_id)
            .field("stage", &self.stage)
            .field("queue", &self.queue)
            .field("log", &self.log)
            .field("tools", &"<dyn ToolProvider>")
            .field("generator", &"<dyn GenerationProvider>")
            .field("notification_channel", &self.notification_channel)
            .finish()
    }
}

impl NotificationHandler for Pipeline {
    fn get_outgoing_channel(&self) -> &Option<Sender<Notification>> {
        &self.notification_channel
    }

    fn get_channel_name(&self) -> &String {
        &self.name
    }
}
