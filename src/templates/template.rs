use core::fmt;
use std::collections::HashMap;

use super::TemplateDataSource;

/// Prompt text with `{{key}}` placeholders.
///
/// Placeholders are filled in one pass over the template text, so text
/// coming from a value is never expanded again. The caller's values take
/// precedence over the data source's; unknown placeholders are left as
/// they are.
pub struct Template {
    content: String,
    data_source: Option<Box<dyn TemplateDataSource>>,
}

impl Template {
    pub fn new<D: TemplateDataSource + 'static>(content: &str, data_source: D) -> Self {
        Self {
            content: content.to_string(),
            data_source: Some(Box::new(data_source)),
        }
    }

    pub fn simple<T>(content: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            content: content.into(),
            data_source: None,
        }
    }

    pub async fn compile(&self, data: &HashMap<String, String>) -> String {
        let mut values = match &self.data_source {
            Some(source) => source.get_values().await,
            None => HashMap::new(),
        };
        values.extend(data.iter().map(|(k, v)| (k.clone(), v.clone())));

        fill(&self.content, &values)
    }
}

fn fill(content: &str, values: &HashMap<String, String>) -> String {
    let mut filled = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(open) = rest.find("{{") {
        filled.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            rest = &rest[open..];
            break;
        };
        let key = &after[..close];
        match values.get(key) {
            Some(value) => filled.push_str(value),
            None => filled.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &after[close + 2..];
    }

    filled.push_str(rest);
    filled
}

impl Clone for Template {
    fn clone(&self) -> Self {
        Self {
            content: self.content.clone(),
            data_source: self
                .data_source
                .as_ref()
                .map(|data_source| data_source.clone_data_source()),
        }
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("content", &self.content)
            .field(
                "data_source",
                &self
                    .data_source
                    .as_ref()
                    .map(|_| "Some(Box<dyn TemplateDataSource>)")
                    .unwrap_or("None"),
            )
            .finish()
    }
}
