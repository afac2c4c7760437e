use crate::{
  error::RxError,
  observable::CoreObservable,
  observer::{BoxedObserver, Observer},
  subscription::Subscription,
};

/// Completes without emitting.
#[derive(Clone, Copy)]
pub struct Empty;

impl CoreObservable for Empty {
  fn actual_subscribe(&self, observer: BoxedObserver) -> Subscription {
    if !observer.is_closed() {
      observer.complete();
    }
    Subscription::closed()
  }
}

/// Never emits and never terminates. The observer is dropped right away
/// since nothing will ever reach it.
#[derive(Clone, Copy)]
pub struct Never;

impl CoreObservable for Never {
  fn actual_subscribe(&self, _observer: BoxedObserver) -> Subscription { Subscription::default() }
}

/// Errors immediately.
#[derive(Clone)]
pub struct Throw(pub(crate) RxError);

impl CoreObservable for Throw {
  fn actual_subscribe(&self, observer: BoxedObserver) -> Subscription {
    if !observer.is_closed() {
      observer.error(self.0.clone());
    }
    Subscription::closed()
  }
}

#[cfg(test)]
mod tests {
  use crate::{prelude::*, test_util::record};

  #[test]
  fn empty_completes() {
    let r = record(Observable::empty());
    assert!(r.values::<Value>().is_empty());
    assert!(r.is_completed());
  }

  #[test]
  fn never_stays_open() {
    let r = record(Observable::never());
    assert!(!r.is_completed());
    assert!(r.error().is_none());
    assert!(r.subscription.is_subscribed());
    r.subscription.unsubscribe();
    assert!(r.subscription.is_closed());
  }

  #[test]
  fn throw_errors() {
    let r = record(Observable::throw(RxError::msg("bad")));
    assert!(matches!(r.error(), Some(RxError::Message(m)) if m == "bad"));
  }
}
