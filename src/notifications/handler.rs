use tokio::sync::mpsc::{error::TrySendError, Sender};

use crate::{activity::ActivityRecord, pipeline::PipelineStage};

use super::{Notification, NotificationContent};

pub trait NotificationHandler {
    fn get_outgoing_channel(&self) -> &Option<Sender<Notification>>;
    fn get_channel_name(&self) -> &String;

    /// Send a notification with the given content.
    ///
    /// Returns `true` if successfully delivered, `false` otherwise.
    async fn notify(&self, content: NotificationContent) -> bool {
        let Some(notification_channel) = self.get_outgoing_channel() else {
            return false;
        };
        deliver(
            notification_channel,
            Notification::new(self.get_channel_name().clone(), content),
        )
    }

    async fn notify_stage(&self, stage: PipelineStage) -> bool {
        self.notify(NotificationContent::StageChanged(stage)).await
    }
    async fn notify_activity(&self, record: ActivityRecord) -> bool {
        self.notify(NotificationContent::Activity(record)).await
    }
    async fn notify_done(&self, entries: usize) -> bool {
        self.notify(NotificationContent::Done(entries)).await
    }
}

/// Queue `notification` without waiting for the receiver.
///
/// A full or closed channel drops the notification; the run goes on.
pub(crate) fn deliver(channel: &Sender<Notification>, notification: Notification) -> bool {
    match channel.try_send(notification) {
        Ok(()) => true,
        Err(TrySendError::Full(dropped)) => {
            tracing::warn!(
                pipeline = %dropped.pipeline,
                capacity = channel.max_capacity(),
                "Notification channel full, dropping notification"
            );
            false
        }
        Err(TrySendError::Closed(_)) => {
            tracing::error!("Failed sending notification: channel closed");
            false
        }
    }
}
