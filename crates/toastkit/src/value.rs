//! Values that are either fixed up front or computed from an argument later.

use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// A value of type `V`, either static or computed from an `&A`.
///
/// Toast messages use `ValueOrFn<String, Toast>` so a renderer can derive the
/// text from the toast itself. Promise bindings use `ValueOrFn<String, T>`
/// and `ValueOrFn<String, E>` so the terminal message can mention the
/// operation's result or error.
pub enum ValueOrFn<V, A: ?Sized> {
    Value(V),
    Fn(Arc<dyn Fn(&A) -> V + Send + Sync>),
}

impl<V, A: ?Sized> ValueOrFn<V, A> {
    /// Wrap a unary function.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&A) -> V + Send + Sync + 'static,
    {
        Self::Fn(Arc::new(f))
    }

    /// Returns the static value, if this is not computed.
    pub fn as_value(&self) -> Option<&V> {
        match self {
            Self::Value(v) => Some(v),
            Self::Fn(_) => None,
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, Self::Fn(_))
    }
}

impl<V: Clone, A: ?Sized> ValueOrFn<V, A> {
    /// Resolve against `arg`.
    ///
    /// A static value is returned unchanged and `arg` is ignored. A function is
    /// called with `arg`; if it panics, the panic unwinds through this call.
    pub fn resolve(&self, arg: &A) -> V {
        match self {
            Self::Value(v) => v.clone(),
            Self::Fn(f) => f(arg),
        }
    }
}

impl<V: Clone, A: ?Sized> Clone for ValueOrFn<V, A> {
    fn clone(&self) -> Self {
        match self {
            Self::Value(v) => Self::Value(v.clone()),
            Self::Fn(f) => Self::Fn(Arc::clone(f)),
        }
    }
}

impl<V: fmt::Debug, A: ?Sized> fmt::Debug for ValueOrFn<V, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Fn(_) => f.write_str("Fn(..)"),
        }
    }
}

impl<A: ?Sized> From<&str> for ValueOrFn<String, A> {
    fn from(value: &str) -> Self {
        Self::Value(value.to_owned())
    }
}

impl<A: ?Sized> From<String> for ValueOrFn<String, A> {
    fn from(value: String) -> Self {
        Self::Value(value)
    }
}

// Computed values have no serializable form and are written as `null`.
impl<V: Serialize, A: ?Sized> Serialize for ValueOrFn<V, A> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => v.serialize(serializer),
            Self::Fn(_) => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_value_is_returned_unchanged() {
        let value: ValueOrFn<String, i32> = "done".into();
        assert_eq!(value.resolve(&42), "done");
        assert!(!value.is_computed());
    }

    #[test]
    fn function_is_called_with_argument() {
        let value: ValueOrFn<String, i32> = ValueOrFn::from_fn(|v| format!("Got {v}"));
        assert_eq!(value.resolve(&42), "Got 42");
        assert!(value.as_value().is_none());
    }

    #[test]
    #[should_panic(expected = "resolver exploded")]
    fn function_panic_propagates() {
        let value: ValueOrFn<String, i32> = ValueOrFn::from_fn(|_| panic!("resolver exploded"));
        value.resolve(&1);
    }

    #[test]
    fn computed_value_serializes_as_null() {
        let fixed: ValueOrFn<String, ()> = "hello".into();
        let computed: ValueOrFn<String, ()> = ValueOrFn::from_fn(|_| "x".to_string());

        assert_eq!(serde_json::to_value(&fixed).unwrap(), "hello");
        assert!(serde_json::to_value(&computed).unwrap().is_null());
    }
}
