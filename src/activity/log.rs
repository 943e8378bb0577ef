use core::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::record::{ActivityRecord, ActivityStage, Outcome};
use crate::work::ItemId;

/// Callback run on every record as it is appended.
pub(crate) type ActivityListener = Arc<dyn Fn(&ActivityRecord) + Send + Sync>;

/// Append-only audit trail of every stage invocation in a run.
#[derive(Clone, Default, Serialize)]
pub struct ActivityLog {
    records: Vec<ActivityRecord>,
    #[serde(skip)]
    listener: Option<ActivityListener>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_listener(&mut self, listener: ActivityListener) {
        self.listener = Some(listener);
    }

    pub(crate) fn clear_listener(&mut self) {
        self.listener = None;
    }

    pub(crate) fn append<A>(
        &mut self,
        stage: ActivityStage,
        item_id: ItemId,
        action: A,
        outcome: Outcome,
    ) -> &ActivityRecord
    where
        A: Into<String>,
    {
        let seq = self.records.len() as u64;
        self.records
            .push(ActivityRecord::new(seq, stage, item_id, action.into(), outcome));
        let record = &self.records[self.records.len() - 1];
        if let Some(listener) = &self.listener {
            listener(record);
        }
        record
    }

    pub fn records(&self) -> &[ActivityRecord] {
        &self.records
    }

    /// Records appended at or after position `from`.
    pub fn since(&self, from: usize) -> &[ActivityRecord] {
        self.records.get(from..).unwrap_or_default()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ActivityRecord> {
        self.records.iter().filter(|r| r.is_failure())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rendered view of the log, in recorded order.
    pub fn summary(&self) -> Vec<String> {
        self.records.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Debug for ActivityLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivityLog")
            .field("records", &self.records)
            .field("listener", &self.listener.as_ref().map(|_| "<listener>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn listener_sees_each_record_when_appended() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut log = ActivityLog::new();
        log.set_listener(Arc::new(move |record: &ActivityRecord| {
            sink.lock().unwrap().push(record.seq);
        }));

        log.append(ActivityStage::Annotation, ItemId::Index(0), "sentiment", Outcome::Success);
        assert_eq!(*seen.lock().unwrap(), vec![0]);
        log.append(ActivityStage::Annotation, ItemId::Index(1), "sentiment", Outcome::Success);
        assert_eq!(*seen.lock().unwrap(), vec![0, 1]);

        log.clear_listener();
        log.append(ActivityStage::Annotation, ItemId::Index(2), "sentiment", Outcome::Success);
        assert_eq!(seen.lock().unwrap().len(), 2);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn append_assigns_increasing_sequence_numbers() {
        let mut log = ActivityLog::new();
        log.append(ActivityStage::Annotation, ItemId::Index(0), "sentiment", Outcome::Success);
        log.append(
            ActivityStage::Annotation,
            ItemId::Index(1),
            "sentiment",
            Outcome::Failure("timeout".into()),
        );

        let seqs: Vec<u64> = log.records().iter().map(|r| r.seq).collect();
        assert_eq!(seqs, vec![0, 1]);
        assert_eq!(log.failures().count(), 1);
        assert_eq!(log.since(1).len(), 1);
        assert!(log.since(5).is_empty());
    }

    #[test]
    fn summary_renders_outcomes() {
        let mut log = ActivityLog::new();
        log.append(ActivityStage::FollowUp, ItemId::from("doc-1"), "answer:summary", Outcome::Success);
        log.append(
            ActivityStage::FollowUp,
            ItemId::from("doc-1"),
            "tags",
            Outcome::Failure("boom".into()),
        );

        assert_eq!(
            log.summary(),
            vec![
                "[0] follow_up item=\"doc-1\" action=answer:summary ok".to_string(),
                "[1] follow_up item=\"doc-1\" action=tags failed: boom".to_string(),
            ]
        );
    }
}
