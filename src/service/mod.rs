//! Template service: storage lookups, validation on write, rendering
//!
//! Ties a [`TemplateStore`] to the [`Resolver`] and [`TemplateValidator`].
//! Lookups fall back to the configured fallback language when a template is
//! missing in the requested one.

mod store;
mod template;

pub use store::{MemoryStore, TemplateStore};
pub use template::{RenderedMessage, Template, TemplateUpdate};

use std::collections::BTreeMap;

use thiserror::Error;

use crate::config::Config;
use crate::context::Context;
use crate::error::ResolveError;
use crate::resolver::Resolver;
use crate::validator::{TemplateValidator, ValidationResult};

/// Errors from template service operations
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("template not found: model={model} key={key} lang={lang} channel={channel}")]
    NotFound {
        model: String,
        key: String,
        lang: String,
        channel: String,
    },

    #[error("template already exists: model={model} key={key} lang={lang} channel={channel}")]
    Duplicated {
        model: String,
        key: String,
        lang: String,
        channel: String,
    },

    #[error("no template with id {id}")]
    UnknownId { id: u64 },

    #[error("missing required fields: {}", fields.join(", "))]
    DataMissing { fields: Vec<String> },

    #[error("Template validation failed: {}", validation.error_messages().join(", "))]
    Validation { validation: ValidationResult },

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl ServiceError {
    fn not_found(model: &str, key: &str, lang: &str, channel: &str) -> Self {
        Self::NotFound {
            model: model.to_string(),
            key: key.to_string(),
            lang: lang.to_string(),
            channel: channel.to_string(),
        }
    }

    fn duplicated(template: &Template) -> Self {
        Self::Duplicated {
            model: template.model.clone(),
            key: template.key.clone(),
            lang: template.lang.clone(),
            channel: template.channel.clone(),
        }
    }
}

/// Creates, looks up and renders templates
pub struct TemplateService<S: TemplateStore> {
    store: S,
    resolver: Resolver,
    validator: TemplateValidator,
    fallback_lang: String,
}

impl<S: TemplateStore> TemplateService<S> {
    pub fn new(store: S, config: &Config) -> Self {
        Self {
            store,
            resolver: Resolver::new(config),
            validator: TemplateValidator::new(config),
            fallback_lang: config.fallback_lang.clone(),
        }
    }

    /// Replace the resolver, e.g. to register extra strategies
    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate and store a new template
    pub fn create_template(&self, template: Template) -> Result<Template, ServiceError> {
        let missing = template.missing_fields();
        if !missing.is_empty() {
            return Err(ServiceError::DataMissing {
                fields: missing.into_iter().map(String::from).collect(),
            });
        }

        if self
            .store
            .find_by_key(&template.key, &template.lang, &template.channel, &template.model)
            .is_some()
        {
            return Err(ServiceError::duplicated(&template));
        }

        self.ensure_valid(
            std::iter::once(template.body.as_str()).chain(variant_bodies(&template)),
        )?;

        let saved = self.store.save(template);
        tracing::info!(
            id = saved.id,
            model = %saved.model,
            key = %saved.key,
            lang = %saved.lang,
            channel = %saved.channel,
            "template created"
        );
        Ok(saved)
    }

    /// Update a stored template
    ///
    /// A changed body or variant set is validated, and moving the template to
    /// another model/key/lang/channel slot must not collide with an existing
    /// template.
    pub fn update_template(
        &self,
        id: u64,
        update: TemplateUpdate,
    ) -> Result<Template, ServiceError> {
        let current = self
            .store
            .find_by_id(id)
            .ok_or(ServiceError::UnknownId { id })?;
        let mut candidate = current.clone();
        update.clone().apply(&mut candidate);

        let taken = || {
            self.store
                .find_by_key(&candidate.key, &candidate.lang, &candidate.channel, &candidate.model)
                .is_some()
        };
        if !candidate.same_slot(&current) && taken() {
            return Err(ServiceError::duplicated(&candidate));
        }

        let body = Some(candidate.body.as_str()).filter(|_| candidate.body != current.body);
        let variants: Vec<&str> = if candidate.variants != current.variants {
            variant_bodies(&candidate).collect()
        } else {
            Vec::new()
        };
        self.ensure_valid(body.into_iter().chain(variants))?;

        let updated = self
            .store
            .update(id, update)
            .ok_or(ServiceError::UnknownId { id })?;
        tracing::info!(
            id,
            model = %updated.model,
            key = %updated.key,
            lang = %updated.lang,
            channel = %updated.channel,
            "template updated"
        );
        Ok(updated)
    }

    pub fn delete_template(&self, id: u64) -> bool {
        self.store.delete(id)
    }

    pub fn templates_for_model(&self, model: &str) -> Vec<Template> {
        self.store.find_for_model(model)
    }

    /// Find a template, trying the fallback language when the requested one
    /// has none
    pub fn get_template(
        &self,
        model: &str,
        key: &str,
        lang: &str,
        channel: &str,
    ) -> Result<Template, ServiceError> {
        if let Some(template) = self.store.find_by_key(key, lang, channel, model) {
            return Ok(template);
        }

        if self.fallback_lang != lang {
            if let Some(template) =
                self.store
                    .find_by_key(key, &self.fallback_lang, channel, model)
            {
                tracing::debug!(
                    model,
                    key,
                    lang,
                    fallback_lang = %self.fallback_lang,
                    "using fallback-language template"
                );
                return Ok(template);
            }
        }

        Err(ServiceError::not_found(model, key, lang, channel))
    }

    /// Look up a template and resolve its body and variant bodies
    pub fn render_template(
        &self,
        model: &str,
        key: &str,
        lang: &str,
        channel: &str,
        context: &dyn Context,
    ) -> Result<RenderedMessage, ServiceError> {
        let template = self.get_template(model, key, lang, channel)?;
        self.render(&template, context)
    }

    /// Resolve a template that is already in hand
    pub fn render(
        &self,
        template: &Template,
        context: &dyn Context,
    ) -> Result<RenderedMessage, ServiceError> {
        let resolve = |text: &str| {
            self.resolver
                .resolve(text, context, &template.key, &template.lang, &template.channel)
        };

        let body = resolve(template.body.as_str())?;
        let mut variants = BTreeMap::new();
        for (name, text) in template.variants.iter().flatten() {
            variants.insert(name.clone(), resolve(text.as_str())?);
        }

        Ok(RenderedMessage {
            body,
            variants,
            with_file: template.with_file,
        })
    }

    /// Validate template text, optionally against known variable names
    pub fn validate_template<K: AsRef<str>>(
        &self,
        text: &str,
        known_variables: &[K],
    ) -> ValidationResult {
        self.validator.validate_with_known(text, known_variables)
    }

    /// Validate several texts, reporting every finding together
    fn ensure_valid<'t>(
        &self,
        texts: impl IntoIterator<Item = &'t str>,
    ) -> Result<(), ServiceError> {
        let validation = texts
            .into_iter()
            .map(|text| self.validator.validate(text))
            .fold(ValidationResult::success(), ValidationResult::merge);
        if validation.is_valid() {
            Ok(())
        } else {
            Err(ServiceError::Validation { validation })
        }
    }
}

fn variant_bodies(template: &Template) -> impl Iterator<Item = &str> {
    template
        .variants
        .iter()
        .flat_map(|variants| variants.values())
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::context::MapContext;

    fn service() -> TemplateService<MemoryStore> {
        TemplateService::new(MemoryStore::new(), &Config::new().with_fallback_lang("ar"))
    }

    #[test]
    fn test_create_rejects_missing_fields() {
        let err = service()
            .create_template(Template::new("Invoice", "", "en", "email", ""))
            .unwrap_err();
        match err {
            ServiceError::DataMissing { fields } => assert_eq!(fields, vec!["key", "body"]),
            other => panic!("Expected DataMissing, got {:?}", other),
        }
    }

    #[test]
    fn test_create_rejects_invalid_body() {
        let err = service()
            .create_template(Template::new("Invoice", "k", "en", "email", "Hello [name"))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));
        assert!(err.to_string().starts_with("Template validation failed: "));
    }

    #[test]
    fn test_create_rejects_invalid_variant() {
        let template =
            Template::new("Invoice", "k", "en", "push", "ok").with_variant("title", "[]");
        let err = service().create_template(template).unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));
    }

    #[test]
    fn test_create_rejects_duplicate() {
        let svc = service();
        svc.create_template(Template::new("Invoice", "k", "en", "email", "a"))
            .unwrap();
        let err = svc
            .create_template(Template::new("Invoice", "k", "en", "email", "b"))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Duplicated { .. }));
    }

    #[test]
    fn test_fallback_language_is_used() {
        let svc = service();
        svc.create_template(Template::new("Invoice", "k", "ar", "email", "arabic"))
            .unwrap();
        let found = svc.get_template("Invoice", "k", "en", "email").unwrap();
        assert_eq!(found.body, "arabic");
    }

    #[test]
    fn test_not_found() {
        let err = service().get_template("Invoice", "k", "en", "email").unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[test]
    fn test_render_variants() {
        let svc = service();
        svc.create_template(
            Template::new("Invoice", "paid", "en", "push", "Invoice #[id] paid")
                .with_variant("title", "Payment from [client->name]")
                .with_file(true),
        )
        .unwrap();

        let ctx = MapContext::new()
            .attr("id", 9)
            .relation("client", MapContext::new().attr("name", "Ann"));
        let rendered = svc
            .render_template("Invoice", "paid", "en", "push", &ctx)
            .unwrap();

        assert_eq!(rendered.body, "Invoice #9 paid");
        assert_eq!(rendered.variants["title"], "Payment from Ann");
        assert!(rendered.with_file);
    }

    #[test]
    fn test_update_validates_body() {
        let svc = service();
        let saved = svc
            .create_template(Template::new("Invoice", "k", "en", "email", "a"))
            .unwrap();
        let id = saved.id.unwrap();

        let err = svc
            .update_template(
                id,
                TemplateUpdate {
                    body: Some("[".to_string()),
                    ..TemplateUpdate::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));

        let updated = svc
            .update_template(
                id,
                TemplateUpdate {
                    body: Some("[id]".to_string()),
                    ..TemplateUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(updated.body, "[id]");

        let err = svc.update_template(999, TemplateUpdate::default()).unwrap_err();
        assert!(matches!(err, ServiceError::UnknownId { id: 999 }));
    }

    #[test]
    fn test_update_blank_body_keeps_existing() {
        let svc = service();
        let id = svc
            .create_template(Template::new("Invoice", "k", "en", "email", "Hello [name]"))
            .unwrap()
            .id
            .unwrap();

        let updated = svc
            .update_template(
                id,
                TemplateUpdate {
                    body: Some(String::new()),
                    ..TemplateUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(updated.body, "Hello [name]");
        assert_eq!(svc.store().find_by_id(id).unwrap().body, "Hello [name]");
    }

    #[test]
    fn test_update_validates_variants() {
        let svc = service();
        let id = svc
            .create_template(Template::new("Invoice", "k", "en", "push", "ok"))
            .unwrap()
            .id
            .unwrap();

        let variants = BTreeMap::from([
            ("title".to_string(), "Hello [name".to_string()),
            ("body".to_string(), "[]".to_string()),
        ]);
        let err = svc
            .update_template(
                id,
                TemplateUpdate {
                    variants: Some(variants),
                    ..TemplateUpdate::default()
                },
            )
            .unwrap_err();

        match err {
            ServiceError::Validation { validation } => {
                let messages = validation.error_messages();
                assert!(messages.contains(&"Empty variable found".to_string()));
                assert!(messages.iter().any(|m| m.starts_with("Mismatched brackets")));
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
        assert_eq!(svc.store().find_by_id(id).unwrap().variants, None);
    }

    #[test]
    fn test_update_moves_slot_unless_taken() {
        let svc = service();
        let en = svc
            .create_template(Template::new("Invoice", "k", "en", "email", "en"))
            .unwrap();
        svc.create_template(Template::new("Invoice", "k", "fr", "email", "fr"))
            .unwrap();
        let id = en.id.unwrap();

        let err = svc
            .update_template(
                id,
                TemplateUpdate {
                    lang: Some("fr".to_string()),
                    ..TemplateUpdate::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, ServiceError::Duplicated { .. }));

        let moved = svc
            .update_template(
                id,
                TemplateUpdate {
                    lang: Some("de".to_string()),
                    ..TemplateUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(moved.lang, "de");
        assert!(svc.get_template("Invoice", "k", "de", "email").is_ok());
    }
}
