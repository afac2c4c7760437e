//! The end of every chain: observers built from `subscribe` arguments.

use crate::{
  config::{self, ErrorPolicy},
  error::{Result, RxError},
  observable::Observable,
  observer::Observer,
  subscription::Subscription,
  value::{Value, ValueType},
};

/// Where an error goes when it reaches the end of a chain.
pub(crate) enum ErrorHandler {
  Callback(Box<dyn FnOnce(RxError)>),
  /// No handler was passed to `subscribe`; the policy current at that time
  /// applies.
  Policy(ErrorPolicy),
}

impl ErrorHandler {
  fn handle(self, err: RxError) {
    match self {
      Self::Callback(callback) => callback(err),
      Self::Policy(policy) => policy.handle(err),
    }
  }
}

impl Default for ErrorHandler {
  fn default() -> Self { Self::Policy(config::error_policy()) }
}

/// Observer assembled from closures.
///
/// `next` receives typed values; a value that does not convert is reported
/// through the error path and closes the observer.
pub(crate) struct FnObserver<N> {
  next: N,
  error: Option<ErrorHandler>,
  complete: Option<Box<dyn FnOnce()>>,
  closed: bool,
}

impl<N> FnObserver<N>
where
  N: FnMut(Value) -> Result<()>,
{
  pub(crate) fn new(next: N, error: ErrorHandler, complete: Option<Box<dyn FnOnce()>>) -> Self {
    Self { next, error: Some(error), complete, closed: false }
  }
}

/// Adapts a typed callback to one that accepts any [`Value`].
pub(crate) fn typed_next<T: ValueType>(mut next: impl FnMut(T)) -> impl FnMut(Value) -> Result<()> {
  move |value: Value| -> Result<()> {
    next(value.unwrap::<T>()?);
    Ok(())
  }
}

impl<N> Observer for FnObserver<N>
where
  N: FnMut(Value) -> Result<()>,
{
  fn next(&mut self, value: Value) {
    if self.closed {
      return;
    }
    if let Err(err) = (self.next)(value) {
      self.closed = true;
      if let Some(handler) = self.error.take() {
        handler.handle(err);
      }
    }
  }

  fn error(self, err: RxError) {
    if !self.closed {
      if let Some(handler) = self.error {
        handler.handle(err);
      }
    }
  }

  fn complete(self) {
    if !self.closed {
      if let Some(complete) = self.complete {
        complete();
      }
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.closed }
}

/// Couples the final observer with the subscription returned to the caller.
///
/// The subscription closes on any terminal notification and as soon as the
/// observer reports itself closed; once closed nothing more is delivered.
pub(crate) struct Subscriber<O> {
  observer: Option<O>,
  subscription: Subscription,
}

impl<O: Observer> Observer for Subscriber<O> {
  fn next(&mut self, value: Value) {
    if self.subscription.is_closed() {
      return;
    }
    if let Some(observer) = &mut self.observer {
      observer.next(value);
      if observer.is_closed() {
        self.observer = None;
        self.subscription.unsubscribe();
      }
    }
  }

  fn error(mut self, err: RxError) {
    if self.subscription.is_closed() {
      return;
    }
    self.subscription.unsubscribe();
    self.observer.take().error(err);
  }

  fn complete(mut self) {
    if self.subscription.is_closed() {
      return;
    }
    self.subscription.unsubscribe();
    self.observer.take().complete();
  }

  fn is_closed(&self) -> bool { self.subscription.is_closed() }
}

/// Subscribes `observer` to `source` and returns the root subscription.
pub(crate) fn subscribe(source: &Observable, observer: impl Observer + 'static) -> Subscription {
  let subscription = Subscription::default();
  let subscriber = Subscriber { observer: Some(observer), subscription: subscription.clone() };
  let upstream = source.actual_subscribe(Box::new(subscriber));
  subscription.add(upstream);
  subscription
}
