use std::{cell::RefCell, fmt, rc::Rc};

use crate::{
  error::RxError,
  observable::CoreObservable,
  observer::{BoxedObserver, Observer},
  subject::Subject,
  subscription::Subscription,
  value::{Value, ValueType},
};

/// A [`Subject`] that holds a current value. Every new subscriber receives
/// that value first.
#[derive(Clone)]
pub struct BehaviorSubject {
  subject: Subject,
  value: Rc<RefCell<Value>>,
}

impl BehaviorSubject {
  pub fn new(value: impl ValueType) -> Self {
    Self { subject: Subject::default(), value: Rc::new(RefCell::new(value.into_value())) }
  }

  /// The latest value passed to `next`, or the initial one.
  pub fn value(&self) -> Value { self.value.borrow().clone() }

  pub fn next(&self, value: impl ValueType) {
    let value = value.into_value();
    *self.value.borrow_mut() = value.clone();
    self.subject.emit(value);
  }

  #[inline]
  pub fn error(&self, err: RxError) { self.subject.error(err) }

  #[inline]
  pub fn complete(&self) { self.subject.complete() }

  #[inline]
  pub fn observer_count(&self) -> usize { self.subject.observer_count() }

  #[inline]
  pub fn is_terminated(&self) -> bool { self.subject.is_terminated() }
}

impl CoreObservable for BehaviorSubject {
  fn actual_subscribe(&self, mut observer: BoxedObserver) -> Subscription {
    if !self.subject.is_terminated() {
      observer.next(self.value());
      if observer.is_closed() {
        return Subscription::closed();
      }
    }
    self.subject.actual_subscribe(observer)
  }
}

impl fmt::Debug for BehaviorSubject {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("BehaviorSubject")
      .field("value", &self.value())
      .field("subject", &self.subject)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use crate::{prelude::*, test_util::record};

  #[test]
  fn emits_current_value_on_subscribe() {
    let subject = BehaviorSubject::new(0);
    let first = record(subject.clone());
    subject.next(1);
    let second = record(subject.clone());
    subject.next(2);
    assert_eq!(first.values::<i32>(), vec![0, 1, 2]);
    assert_eq!(second.values::<i32>(), vec![1, 2]);
    assert_eq!(subject.value(), Value::wrap(2));
  }

  #[test]
  fn completed_subject_only_completes() {
    let subject = BehaviorSubject::new(String::from("initial"));
    subject.complete();
    let r = record(subject.clone());
    assert!(r.values::<String>().is_empty());
    assert!(r.is_completed());
  }

  #[test]
  fn take_one_reads_current_value() {
    let subject = BehaviorSubject::new(7);
    let r = record(subject.clone().take(1));
    assert_eq!(r.values::<i32>(), vec![7]);
    assert!(r.is_completed());
    assert_eq!(subject.observer_count(), 0);
  }
}
