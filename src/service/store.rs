//! Template storage contract and an in-memory implementation

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::template::{Template, TemplateUpdate};

/// Where templates live
pub trait TemplateStore: Send + Sync {
    fn find_by_id(&self, id: u64) -> Option<Template>;

    fn find_by_key(&self, key: &str, lang: &str, channel: &str, model: &str) -> Option<Template>;

    fn find_for_model(&self, model: &str) -> Vec<Template>;

    /// Store a new template, returning it with its assigned id
    fn save(&self, template: Template) -> Template;

    /// Apply an update; `None` if no template has this id
    fn update(&self, id: u64, update: TemplateUpdate) -> Option<Template>;

    /// Remove a template; false if no template has this id
    fn delete(&self, id: u64) -> bool;
}

/// Templates kept in memory, ordered by id
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    templates: BTreeMap<u64, Template>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.read(|inner| inner.templates.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read<T>(&self, f: impl FnOnce(&Inner) -> T) -> T {
        let guard = self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&guard)
    }

    fn write<T>(&self, f: impl FnOnce(&mut Inner) -> T) -> T {
        let mut guard = self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}

impl TemplateStore for MemoryStore {
    fn find_by_id(&self, id: u64) -> Option<Template> {
        self.read(|inner| inner.templates.get(&id).cloned())
    }

    fn find_by_key(&self, key: &str, lang: &str, channel: &str, model: &str) -> Option<Template> {
        self.read(|inner| {
            inner
                .templates
                .values()
                .find(|t| {
                    t.key == key && t.lang == lang && t.channel == channel && t.model == model
                })
                .cloned()
        })
    }

    fn find_for_model(&self, model: &str) -> Vec<Template> {
        self.read(|inner| {
            inner
                .templates
                .values()
                .filter(|t| t.model == model)
                .cloned()
                .collect()
        })
    }

    fn save(&self, mut template: Template) -> Template {
        self.write(|inner| {
            inner.next_id += 1;
            template.id = Some(inner.next_id);
            inner.templates.insert(inner.next_id, template.clone());
            template
        })
    }

    fn update(&self, id: u64, update: TemplateUpdate) -> Option<Template> {
        self.write(|inner| {
            let template = inner.templates.get_mut(&id)?;
            update.apply(template);
            Some(template.clone())
        })
    }

    fn delete(&self, id: u64) -> bool {
        self.write(|inner| inner.templates.remove(&id).is_some())
    }
}
