use std::rc::Rc;

use crate::{
  observable::CoreObservable,
  observer::{BoxedObserver, Observer},
  subscription::Subscription,
  value::Value,
};

/// Emits one value, then completes.
#[derive(Clone)]
pub struct Just(pub(crate) Value);

impl CoreObservable for Just {
  fn actual_subscribe(&self, mut observer: BoxedObserver) -> Subscription {
    if !observer.is_closed() {
      observer.next(self.0.clone());
      observer.complete();
    }
    Subscription::closed()
  }
}

/// Emits a fixed sequence of values, then completes.
///
/// Emission stops early once the observer reports itself closed.
#[derive(Clone)]
pub struct FromIter(pub(crate) Rc<[Value]>);

impl CoreObservable for FromIter {
  fn actual_subscribe(&self, mut observer: BoxedObserver) -> Subscription {
    for value in self.0.iter() {
      if observer.is_closed() {
        return Subscription::closed();
      }
      observer.next(value.clone());
    }
    if !observer.is_closed() {
      observer.complete();
    }
    Subscription::closed()
  }
}
