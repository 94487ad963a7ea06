//! Template records

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A stored message template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Assigned by the store on save
    #[serde(default)]
    pub id: Option<u64>,
    /// Kind of record the template renders against, e.g. `"Invoice"`
    pub model: String,
    pub key: String,
    pub lang: String,
    pub channel: String,
    pub body: String,
    /// Whether the rendered message carries an attachment
    #[serde(default)]
    pub with_file: bool,
    /// Alternate bodies (e.g. push title/body), each resolved independently
    #[serde(default)]
    pub variants: Option<BTreeMap<String, String>>,
}

impl Template {
    pub fn new(
        model: impl Into<String>,
        key: impl Into<String>,
        lang: impl Into<String>,
        channel: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            model: model.into(),
            key: key.into(),
            lang: lang.into(),
            channel: channel.into(),
            body: body.into(),
            with_file: false,
            variants: None,
        }
    }

    pub fn with_file(mut self, with_file: bool) -> Self {
        self.with_file = with_file;
        self
    }

    /// Add an alternate body
    pub fn with_variant(mut self, name: impl Into<String>, body: impl Into<String>) -> Self {
        self.variants
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), body.into());
        self
    }

    /// Names of required fields that are blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("model", &self.model),
            ("key", &self.key),
            ("lang", &self.lang),
            ("channel", &self.channel),
            ("body", &self.body),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Whether two templates address the same slot
    pub fn same_slot(&self, other: &Template) -> bool {
        self.model == other.model
            && self.key == other.key
            && self.lang == other.lang
            && self.channel == other.channel
    }
}

/// Partial update for a stored template
///
/// `None` leaves a field unchanged, and so does a blank string: a required
/// text field can be changed but never cleared.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TemplateUpdate {
    pub model: Option<String>,
    pub key: Option<String>,
    pub lang: Option<String>,
    pub channel: Option<String>,
    pub body: Option<String>,
    pub with_file: Option<bool>,
    pub variants: Option<BTreeMap<String, String>>,
}

impl TemplateUpdate {
    /// Write the changed fields into `template`
    pub fn apply(self, template: &mut Template) {
        fn set(field: &mut String, value: Option<String>) {
            if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
                *field = value;
            }
        }

        set(&mut template.model, self.model);
        set(&mut template.key, self.key);
        set(&mut template.lang, self.lang);
        set(&mut template.channel, self.channel);
        set(&mut template.body, self.body);
        if let Some(with_file) = self.with_file {
            template.with_file = with_file;
        }
        if let Some(variants) = self.variants {
            template.variants = Some(variants);
        }
    }
}

/// A fully resolved template
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedMessage {
    pub body: String,
    pub variants: BTreeMap<String, String>,
    pub with_file: bool,
}
