use crate::work::{AnnotationValue, WorkQueue};

/// Indices of the items whose annotation under `key` equals `value`.
///
/// Indices come back in increasing order. No match yields an empty
/// vector. Comparison is exact: a list annotation only matches an equal
/// list.
pub fn select<V>(queue: &WorkQueue, key: &str, value: V) -> Vec<usize>
where
    V: Into<AnnotationValue>,
{
    let value = value.into();
    queue
        .all()
        .enumerate()
        .filter(|(_, item)| item.annotation(key) == Some(&value))
        .map(|(index, _)| index)
        .collect()
}
