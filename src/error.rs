//! Error type carried by `onError` notifications.

use std::{error::Error, rc::Rc};

use thiserror::Error;

pub type Result<T, E = RxError> = std::result::Result<T, E>;

/// Every error an observable can terminate with.
///
/// `RxError` is `Clone` so a terminated subject can replay the same error to
/// every late subscriber.
#[derive(Debug, Clone, Error)]
pub enum RxError {
  /// A `Value` was unwrapped as a type it does not hold.
  #[error("type mismatch: expected `{expected}`, found `{actual}`")]
  TypeMismatch { expected: &'static str, actual: &'static str },

  /// An error reached a subscriber that supplied no error handler.
  #[error("unhandled error in observable: {0}")]
  UnhandledTerminalError(Box<RxError>),

  /// More sources were combined than the operator family supports.
  #[error("at most {max} sources can be combined, got {actual}")]
  ArityExceeded { max: usize, actual: usize },

  /// A combiner asked for more values than there are sources.
  #[error("combiner takes {expected} values but only {actual} sources were given")]
  ArityMismatch { expected: usize, actual: usize },

  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  #[error("{0}")]
  Message(String),

  #[error("{0}")]
  Custom(Rc<dyn Error>),
}

impl RxError {
  pub fn msg(message: impl Into<String>) -> Self { Self::Message(message.into()) }

  pub fn custom(err: impl Error + 'static) -> Self { Self::Custom(Rc::new(err)) }

  pub(crate) fn type_mismatch<T: ?Sized>(actual: &'static str) -> Self {
    Self::TypeMismatch { expected: std::any::type_name::<T>(), actual }
  }

  /// Strips any number of `UnhandledTerminalError` layers.
  pub fn root(&self) -> &RxError {
    match self {
      Self::UnhandledTerminalError(inner) => inner.root(),
      other => other,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug)]
  struct Boom;

  impl std::fmt::Display for Boom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str("boom") }
  }

  impl Error for Boom {}

  #[test]
  fn display_names_both_types() {
    let err = RxError::type_mismatch::<i32>("alloc::string::String");
    assert_eq!(err.to_string(), "type mismatch: expected `i32`, found `alloc::string::String`");
  }

  #[test]
  fn custom_errors_are_shared_on_clone() {
    let err = RxError::custom(Boom);
    let copy = err.clone();
    match (&err, &copy) {
      (RxError::Custom(a), RxError::Custom(b)) => assert!(Rc::ptr_eq(a, b)),
      _ => unreachable!(),
    }
    assert_eq!(copy.to_string(), "boom");
  }

  #[test]
  fn root_unwraps_unhandled_layers() {
    let err = RxError::UnhandledTerminalError(Box::new(RxError::msg("inner")));
    assert!(matches!(err.root(), RxError::Message(m) if m == "inner"));
    assert_eq!(err.to_string(), "unhandled error in observable: inner");
  }
}
