use crate::{
  error::RxError,
  observable::{CoreObservable, Observable},
  observer::{BoxedObserver, Observer},
  subscription::Subscription,
  value::Value,
};

pub struct RetryOp {
  source: Observable,
  count: usize,
}

impl RetryOp {
  pub(crate) fn observable(source: Observable, count: usize) -> Observable {
    Observable::new(Self { source, count })
  }
}

impl CoreObservable for RetryOp {
  fn actual_subscribe(&self, observer: BoxedObserver) -> Subscription {
    let subscription = Subscription::default();
    let observer = RetryObserver {
      observer,
      source: self.source.clone(),
      remaining: self.count,
      subscription: subscription.clone(),
    };
    subscription.add(self.source.actual_subscribe(Box::new(observer)));
    subscription
  }
}

/// Carries the downstream observer from one attempt to the next.
struct RetryObserver {
  observer: BoxedObserver,
  source: Observable,
  remaining: usize,
  subscription: Subscription,
}

impl Observer for RetryObserver {
  fn next(&mut self, value: Value) { self.observer.next(value) }

  fn error(self, err: RxError) {
    if self.remaining == 0 || self.subscription.is_closed() {
      self.observer.error(err);
      return;
    }
    tracing::trace!(remaining = self.remaining, %err, "retry: resubscribing");
    let source = self.source.clone();
    let subscription = self.subscription.clone();
    let next = RetryObserver { remaining: self.remaining - 1, ..self };
    subscription.add(source.actual_subscribe(Box::new(next)));
  }

  fn complete(self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod tests {
  use std::{cell::Cell, rc::Rc};

  use crate::{prelude::*, test_util::record};

  fn flaky(failures: usize) -> (Observable, Rc<Cell<usize>>) {
    let attempts = Rc::new(Cell::new(0));
    let c_attempts = attempts.clone();
    let o = Observable::create(move |emitter| {
      c_attempts.set(c_attempts.get() + 1);
      emitter.next(c_attempts.get());
      if c_attempts.get() <= failures {
        emitter.error(RxError::msg(format!("attempt {}", c_attempts.get())));
      } else {
        emitter.complete();
      }
    });
    (o, attempts)
  }

  #[test]
  fn resubscribes_until_success() {
    let (source, attempts) = flaky(2);
    let r = record(source.retry(3));
    assert_eq!(attempts.get(), 3);
    assert_eq!(r.values::<usize>(), vec![1, 2, 3]);
    assert!(r.is_completed());
  }

  #[test]
  fn forwards_last_error() {
    let (source, attempts) = flaky(5);
    let r = record(source.retry(2));
    assert_eq!(attempts.get(), 3);
    assert!(matches!(r.error(), Some(RxError::Message(m)) if m == "attempt 3"));
  }

  #[test]
  fn zero_retries_is_identity() {
    let (source, attempts) = flaky(1);
    let r = record(source.retry(0));
    assert_eq!(attempts.get(), 1);
    assert!(r.error().is_some());
  }
}
