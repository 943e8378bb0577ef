use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::NotificationContent;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Name of the emitting pipeline.
    pub pipeline: String,
    pub content: NotificationContent,
    pub timestamp_millis: u128,
}

impl Notification {
    pub fn new(pipeline: String, content: NotificationContent) -> Self {
        Self {
            pipeline,
            content,
            timestamp_millis: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
        }
    }
}
