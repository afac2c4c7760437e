//! Process-wide defaults.
//!
//! The only knob is the [`ErrorPolicy`] applied when an error reaches a
//! subscriber that did not pass an error handler. The policy is read when
//! `subscribe` is called, so changing it never affects live subscriptions.
//! Its initial value comes from the `RXDYN_ERROR_POLICY` environment variable
//! (`terminate`, `panic` or `log`) and defaults to [`ErrorPolicy::Terminate`].

use std::{
  fmt::{Debug, Formatter},
  str::FromStr,
  sync::{Arc, PoisonError, RwLock},
};

use once_cell::sync::Lazy;

use crate::error::RxError;

pub const ERROR_POLICY_ENV: &str = "RXDYN_ERROR_POLICY";

static ERROR_POLICY: Lazy<RwLock<ErrorPolicy>> = Lazy::new(|| RwLock::new(ErrorPolicy::from_env()));

/// What happens to an error nobody handles.
#[derive(Clone, Default)]
pub enum ErrorPolicy {
  /// Log the error and abort the process.
  #[default]
  Terminate,
  /// Panic with the error message.
  Panic,
  /// Log the error and carry on.
  Log,
  Custom(Arc<dyn Fn(&RxError) + Send + Sync>),
}

impl ErrorPolicy {
  pub fn custom(handler: impl Fn(&RxError) + Send + Sync + 'static) -> Self {
    Self::Custom(Arc::new(handler))
  }

  fn from_env() -> Self {
    match std::env::var(ERROR_POLICY_ENV) {
      Ok(raw) => raw.parse().unwrap_or_else(|err: RxError| {
        tracing::warn!(%err, "ignoring {ERROR_POLICY_ENV}");
        Self::default()
      }),
      Err(_) => Self::default(),
    }
  }

  /// Applies the policy to an error that reached a subscriber without a
  /// handler.
  pub fn handle(&self, err: RxError) {
    let err = RxError::UnhandledTerminalError(Box::new(err));
    match self {
      Self::Terminate => {
        tracing::error!(%err, "aborting on unhandled observable error");
        std::process::abort();
      }
      Self::Panic => panic!("{err}"),
      Self::Log => tracing::error!(%err, "unhandled observable error"),
      Self::Custom(handler) => handler(&err),
    }
  }
}

impl Debug for ErrorPolicy {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Terminate => f.write_str("Terminate"),
      Self::Panic => f.write_str("Panic"),
      Self::Log => f.write_str("Log"),
      Self::Custom(_) => f.write_str("Custom(..)"),
    }
  }
}

impl FromStr for ErrorPolicy {
  type Err = RxError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "terminate" | "abort" => Ok(Self::Terminate),
      "panic" => Ok(Self::Panic),
      "log" => Ok(Self::Log),
      other => Err(RxError::InvalidArgument(format!("unknown error policy `{other}`"))),
    }
  }
}

/// The policy new subscriptions without an error handler will use.
pub fn error_policy() -> ErrorPolicy {
  ERROR_POLICY.read().unwrap_or_else(PoisonError::into_inner).clone()
}

/// Replaces the process-wide policy and returns the previous one.
pub fn set_error_policy(policy: ErrorPolicy) -> ErrorPolicy {
  let mut guard = ERROR_POLICY.write().unwrap_or_else(PoisonError::into_inner);
  std::mem::replace(&mut *guard, policy)
}
