use std::{cell::RefCell, collections::VecDeque, fmt, rc::Rc};

use crate::{
  error::RxError,
  observable::CoreObservable,
  observer::{BoxedObserver, Observer},
  subject::Subject,
  subscription::Subscription,
  value::{Value, ValueType},
};

/// A [`Subject`] that replays up to `capacity` of the most recent values,
/// then its terminal notification if any, to every new subscriber.
#[derive(Clone)]
pub struct ReplaySubject {
  subject: Subject,
  buffer: Rc<RefCell<VecDeque<Value>>>,
  capacity: usize,
}

impl ReplaySubject {
  pub fn new(capacity: usize) -> Self {
    Self {
      subject: Subject::default(),
      buffer: Rc::new(RefCell::new(VecDeque::with_capacity(capacity))),
      capacity,
    }
  }

  #[inline]
  pub fn capacity(&self) -> usize { self.capacity }

  pub fn next(&self, value: impl ValueType) { self.push(value.into_value()) }

  #[inline]
  pub fn error(&self, err: RxError) { self.subject.error(err) }

  #[inline]
  pub fn complete(&self) { self.subject.complete() }

  #[inline]
  pub fn observer_count(&self) -> usize { self.subject.observer_count() }

  #[inline]
  pub fn is_terminated(&self) -> bool { self.subject.is_terminated() }

  fn push(&self, value: Value) {
    if self.subject.is_terminated() {
      return;
    }
    if self.capacity > 0 {
      let mut buffer = self.buffer.borrow_mut();
      if buffer.len() == self.capacity {
        buffer.pop_front();
      }
      buffer.push_back(value.clone());
    }
    self.subject.emit(value);
  }
}

impl CoreObservable for ReplaySubject {
  fn actual_subscribe(&self, mut observer: BoxedObserver) -> Subscription {
    let replay: Vec<Value> = self.buffer.borrow().iter().cloned().collect();
    for value in replay {
      if observer.is_closed() {
        return Subscription::closed();
      }
      observer.next(value);
    }
    self.subject.actual_subscribe(observer)
  }
}

impl fmt::Debug for ReplaySubject {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ReplaySubject")
      .field("buffered", &self.buffer.borrow().len())
      .field("capacity", &self.capacity)
      .field("subject", &self.subject)
      .finish()
  }
}
