use core::fmt;

use serde::{Deserialize, Serialize};

use crate::work::{AnnotationValue, ItemId, WorkQueue};

use super::PipelineError;

/// Current value of a requested key, or an explicit marker for its absence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportValue {
    Present(AnnotationValue),
    Missing,
}

impl ReportValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, ReportValue::Missing)
    }
}

impl fmt::Display for ReportValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportValue::Present(v) => write!(f, "{v}"),
            ReportValue::Missing => f.write_str("<missing>"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportField {
    pub key: String,
    pub value: ReportValue,
}

/// Flattened view of one selected item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Position of the item in the queue.
    pub index: usize,
    pub id: ItemId,
    /// One field per requested key, in request order.
    pub fields: Vec<ReportField>,
}

impl ReportEntry {
    pub fn get(&self, key: &str) -> Option<&ReportValue> {
        self.fields.iter().find(|f| f.key == key).map(|f| &f.value)
    }
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        for field in &self.fields {
            write!(f, " | {}: {}", field.key, field.value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub entries: Vec<ReportEntry>,
}

impl Report {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReportEntry> {
        self.entries.iter()
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a ReportEntry;
    type IntoIter = std::slice::Iter<'a, ReportEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// Assemble one entry per index, in the given order.
///
/// Every requested key appears in every entry; keys the item was never
/// annotated with are reported as [`ReportValue::Missing`]. Does not
/// modify the queue.
pub fn build_report<S>(
    queue: &WorkQueue,
    indices: &[usize],
    keys: &[S],
) -> Result<Report, PipelineError>
where
    S: AsRef<str>,
{
    let mut entries = Vec::with_capacity(indices.len());
    for &index in indices {
        let item = queue.get(index)?;
        let fields = keys
            .iter()
            .map(|key| {
                let key: &str = key.as_ref();
                let value = match item.annotation(key) {
                    Some(v) => ReportValue::Present(v.clone()),
                    None => ReportValue::Missing,
                };
                ReportField {
                    key: key.to_string(),
                    value,
                }
            })
            .collect();
        entries.push(ReportEntry {
            index,
            id: item.id().clone(),
            fields,
        });
    }
    Ok(Report { entries })
}
