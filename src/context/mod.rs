//! Data contexts that placeholders are resolved against
//!
//! A context exposes three capabilities: named attributes, named single-hop
//! relations (possibly loaded on demand), and named callables. The resolver
//! never assumes anything else about the shape of the data, so any data model
//! can take part by implementing [`Context`].

mod map;
mod table;

pub use map::MapContext;
pub use table::TomlContext;

use crate::error::ContextError;
use crate::value::Value;

/// Outcome of looking up a relation on a context
pub enum Relation<'a> {
    /// No relation with that name exists
    Missing,
    /// The relation exists but has no related record
    Null,
    /// The related record
    Loaded(Box<dyn Context + 'a>),
}

impl std::fmt::Debug for Relation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Relation::Missing => write!(f, "Missing"),
            Relation::Null => write!(f, "Null"),
            Relation::Loaded(_) => write!(f, "Loaded(..)"),
        }
    }
}

/// Capability set the resolver needs from a data object
pub trait Context {
    /// Look up an attribute. `None` and `Some(Value::Null)` both mean absent.
    fn attribute(&self, name: &str) -> Option<Value>;

    /// Look up a relation, loading it if needed.
    ///
    /// A loader failure is reported as `Err` and becomes a resolution failure.
    fn relation(&self, name: &str) -> Result<Relation<'_>, ContextError>;

    /// Whether a callable with this name exists
    fn has_method(&self, name: &str) -> bool;

    /// Invoke a callable with parsed literal arguments
    fn invoke(&self, name: &str, args: &[Value]) -> Result<Value, ContextError>;
}

impl<C: Context + ?Sized> Context for &C {
    fn attribute(&self, name: &str) -> Option<Value> {
        (**self).attribute(name)
    }

    fn relation(&self, name: &str) -> Result<Relation<'_>, ContextError> {
        (**self).relation(name)
    }

    fn has_method(&self, name: &str) -> bool {
        (**self).has_method(name)
    }

    fn invoke(&self, name: &str, args: &[Value]) -> Result<Value, ContextError> {
        (**self).invoke(name, args)
    }
}

impl<C: Context + ?Sized> Context for Box<C> {
    fn attribute(&self, name: &str) -> Option<Value> {
        (**self).attribute(name)
    }

    fn relation(&self, name: &str) -> Result<Relation<'_>, ContextError> {
        (**self).relation(name)
    }

    fn has_method(&self, name: &str) -> bool {
        (**self).has_method(name)
    }

    fn invoke(&self, name: &str, args: &[Value]) -> Result<Value, ContextError> {
        (**self).invoke(name, args)
    }
}
