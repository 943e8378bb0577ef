mod item;
mod loader;
mod queue;

pub use item::{AnnotationValue, ItemId, WorkItem};
pub use loader::{from_json_value, load_json_file, LoadError, DEFAULT_TEXT_FIELD};
pub use queue::{QueueError, WorkQueue};
