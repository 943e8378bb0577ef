mod data_source;
mod template;

pub use self::{data_source::TemplateDataSource, template::Template};
