pub mod langfuse;
pub mod logging;
