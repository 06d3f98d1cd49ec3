//! The tagged outcome of one unit-of-work invocation

use std::fmt;

use crate::error::BoxError;

/// Either a produced value or a failure, never both meaningfully.
///
/// A failure-tagged outcome still carries a value: the zero representation
/// `T::default()`. It must not be treated as meaningful; check the tag first.
#[derive(Clone, PartialEq, Eq)]
pub struct Outcome<T, E = BoxError> {
    value: T,
    error: Option<E>,
}

impl<T, E> Outcome<T, E> {
    /// Success-tagged outcome holding `value`
    pub fn success(value: T) -> Self {
        Self { value, error: None }
    }

    /// Failure-tagged outcome; the value slot holds `T::default()`
    pub fn failure(error: E) -> Self
    where
        T: Default,
    {
        Self {
            value: T::default(),
            error: Some(error),
        }
    }

    /// The produced value. Only meaningful when [`is_success`](Self::is_success).
    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn error(&self) -> Option<&E> {
        self.error.as_ref()
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    /// Consume and return the value slot, whatever the tag
    pub fn into_value(self) -> T {
        self.value
    }

    pub fn into_parts(self) -> (T, Option<E>) {
        (self.value, self.error)
    }

    pub fn into_result(self) -> Result<T, E> {
        match self.error {
            None => Ok(self.value),
            Some(e) => Err(e),
        }
    }

    pub fn as_result(&self) -> Result<&T, &E> {
        match &self.error {
            None => Ok(&self.value),
            Some(e) => Err(e),
        }
    }
}

impl<T: Default, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(v) => Outcome::success(v),
            Err(e) => Outcome::failure(e),
        }
    }
}

impl<T, E> From<Outcome<T, E>> for Result<T, E> {
    fn from(outcome: Outcome<T, E>) -> Self {
        outcome.into_result()
    }
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for Outcome<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            None => f.debug_tuple("Success").field(&self.value).finish(),
            Some(e) => f.debug_tuple("Failure").field(e).finish(),
        }
    }
}
