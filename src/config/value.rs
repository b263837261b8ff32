//! Property values.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a programmatically registered object.
pub type Handle = Arc<dyn Any + Send + Sync>;

/// A resolved property value.
///
/// Everything read from the command line, the environment or a file is
/// `Text`. `Handle` only ever comes from explicit registration.
#[derive(Clone)]
pub enum Value {
    Text(String),
    Handle(Handle),
}

impl Value {
    /// Wrap an arbitrary object as a handle value.
    pub fn handle<T: Any + Send + Sync>(object: T) -> Self {
        Self::Handle(Arc::new(object))
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Handle(_) => None,
        }
    }

    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Consume into the text, if any.
    #[must_use]
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            Self::Handle(_) => None,
        }
    }

    /// Borrow the registered object as `T`.
    #[must_use]
    pub fn downcast_ref<T: Any + Send + Sync>(&self) -> Option<&T> {
        match self {
            Self::Handle(handle) => handle.downcast_ref::<T>(),
            Self::Text(_) => None,
        }
    }

    /// Clone out a typed `Arc` to the registered object.
    #[must_use]
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            Self::Handle(handle) => Arc::clone(handle).downcast::<T>().ok(),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Handle(_) => f.write_str("Handle(..)"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Handle(_) => f.write_str("<handle>"),
        }
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}
