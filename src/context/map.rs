//! In-memory context built from attributes, relations and closures

use std::collections::HashMap;
use std::fmt;

use super::{Context, Relation};
use crate::error::ContextError;
use crate::value::Value;

type Method = Box<dyn Fn(&[Value]) -> Result<Value, ContextError> + Send + Sync>;
type Loader = Box<dyn Fn() -> Result<Option<MapContext>, ContextError> + Send + Sync>;

enum RelationSlot {
    Null,
    Eager(MapContext),
    Lazy(Loader),
}

/// A context assembled in code
///
/// ```rust
/// use placeholder_engine::{MapContext, Value};
///
/// let invoice = MapContext::new()
///     .attr("id", 123)
///     .relation("client", MapContext::new().attr("name", "John Doe"))
///     .method("formattedAmount", |_| Ok(Value::from("$500.00")));
/// ```
#[derive(Default)]
pub struct MapContext {
    attributes: HashMap<String, Value>,
    relations: HashMap<String, RelationSlot>,
    methods: HashMap<String, Method>,
}

impl MapContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Attach a related record
    pub fn relation(mut self, name: impl Into<String>, related: MapContext) -> Self {
        self.relations.insert(name.into(), RelationSlot::Eager(related));
        self
    }

    /// Declare a relation that has no related record
    pub fn null_relation(mut self, name: impl Into<String>) -> Self {
        self.relations.insert(name.into(), RelationSlot::Null);
        self
    }

    /// Declare a relation materialized on lookup. The loader runs on every
    /// lookup; `Ok(None)` means no related record.
    pub fn lazy_relation<F>(mut self, name: impl Into<String>, loader: F) -> Self
    where
        F: Fn() -> Result<Option<MapContext>, ContextError> + Send + Sync + 'static,
    {
        self.relations
            .insert(name.into(), RelationSlot::Lazy(Box::new(loader)));
        self
    }

    /// Register a callable
    pub fn method<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, ContextError> + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Box::new(f));
        self
    }
}

impl fmt::Debug for MapContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut relations: Vec<&String> = self.relations.keys().collect();
        relations.sort();
        let mut methods: Vec<&String> = self.methods.keys().collect();
        methods.sort();
        f.debug_struct("MapContext")
            .field("attributes", &self.attributes)
            .field("relations", &relations)
            .field("methods", &methods)
            .finish()
    }
}

impl Context for MapContext {
    fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes.get(name).cloned()
    }

    fn relation(&self, name: &str) -> Result<Relation<'_>, ContextError> {
        match self.relations.get(name) {
            None => Ok(Relation::Missing),
            Some(RelationSlot::Null) => Ok(Relation::Null),
            Some(RelationSlot::Eager(related)) => Ok(Relation::Loaded(Box::new(related))),
            Some(RelationSlot::Lazy(loader)) => Ok(match loader()? {
                Some(related) => Relation::Loaded(Box::new(related)),
                None => Relation::Null,
            }),
        }
    }

    fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    fn invoke(&self, name: &str, args: &[Value]) -> Result<Value, ContextError> {
        let method = self
            .methods
            .get(name)
            .ok_or_else(|| ContextError::new(format!("no method named '{}'", name)))?;
        method(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_lookup() {
        let ctx = MapContext::new().attr("id", 123).attr("name", "Acme");
        assert_eq!(ctx.attribute("id"), Some(Value::Int(123)));
        assert_eq!(ctx.attribute("name"), Some(Value::from("Acme")));
        assert_eq!(ctx.attribute("missing"), None);
    }

    #[test]
    fn test_relation_kinds() {
        let ctx = MapContext::new()
            .relation("client", MapContext::new().attr("name", "John"))
            .null_relation("agent")
            .lazy_relation("owner", || Ok(Some(MapContext::new().attr("name", "Jane"))))
            .lazy_relation("broken", || Err(ContextError::new("connection refused")));

        match Context::relation(&ctx, "client").unwrap() {
            Relation::Loaded(c) => assert_eq!(c.attribute("name"), Some(Value::from("John"))),
            other => panic!("Expected Loaded, got {:?}", other),
        }
        assert!(matches!(Context::relation(&ctx, "agent").unwrap(), Relation::Null));
        assert!(matches!(Context::relation(&ctx, "nothing").unwrap(), Relation::Missing));
        match Context::relation(&ctx, "owner").unwrap() {
            Relation::Loaded(c) => assert_eq!(c.attribute("name"), Some(Value::from("Jane"))),
            other => panic!("Expected Loaded, got {:?}", other),
        }
        let err = Context::relation(&ctx, "broken").unwrap_err();
        assert_eq!(err.message, "connection refused");
    }

    #[test]
    fn test_method_invocation() {
        let ctx = MapContext::new().method("double", |args| match args.first() {
            Some(Value::Int(n)) => Ok(Value::Int(n * 2)),
            _ => Err(ContextError::new("expected an integer")),
        });
        assert!(ctx.has_method("double"));
        assert!(!ctx.has_method("triple"));
        assert_eq!(ctx.invoke("double", &[Value::Int(21)]), Ok(Value::Int(42)));
        assert!(ctx.invoke("double", &[]).is_err());
        assert!(ctx.invoke("triple", &[]).is_err());
    }
}
