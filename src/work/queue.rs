use std::slice;

use super::item::WorkItem;

/// Errors raised when addressing a [`WorkQueue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// The requested index is outside `[0, size)`.
    IndexOutOfRange { index: usize, size: usize },
}

impl std::fmt::Display for QueueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueueError::IndexOutOfRange { index, size } => {
                write!(f, "Index {index} out of range for queue of size {size}")
            }
        }
    }
}

impl std::error::Error for QueueError {}

/// Ordered, index-addressable collection of [`WorkItem`]s.
///
/// The order is fixed at creation and items are never removed or
/// reordered for the lifetime of the queue.
#[derive(Debug, Clone, Default)]
pub struct WorkQueue {
    items: Vec<WorkItem>,
}

impl WorkQueue {
    /// Build a queue from raw payloads; item ids are their positions.
    pub fn create<I, T>(payloads: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let items = payloads
            .into_iter()
            .enumerate()
            .map(|(i, payload)| WorkItem::new(i, payload))
            .collect();
        Self { items }
    }

    /// Build a queue from items that already carry their ids.
    pub fn from_items(items: Vec<WorkItem>) -> Self {
        Self { items }
    }

    pub fn get(&self, index: usize) -> Result<&WorkItem, QueueError> {
        let size = self.items.len();
        self.items
            .get(index)
            .ok_or(QueueError::IndexOutOfRange { index, size })
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Result<&mut WorkItem, QueueError> {
        let size = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(QueueError::IndexOutOfRange { index, size })
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the items in index order. Each call starts over.
    pub fn all(&self) -> slice::Iter<'_, WorkItem> {
        self.items.iter()
    }

    pub(crate) fn all_mut(&mut self) -> slice::IterMut<'_, WorkItem> {
        self.items.iter_mut()
    }

    /// Fails on the first index that is not addressable.
    pub(crate) fn check_indices(&self, indices: &[usize]) -> Result<(), QueueError> {
        let size = self.items.len();
        match indices.iter().find(|&&index| index >= size) {
            Some(&index) => Err(QueueError::IndexOutOfRange { index, size }),
            None => Ok(()),
        }
    }
}

impl<'a> IntoIterator for &'a WorkQueue {
    type Item = &'a WorkItem;
    type IntoIter = slice::Iter<'a, WorkItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.all()
    }
}
