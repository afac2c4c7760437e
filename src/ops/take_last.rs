use std::collections::VecDeque;

use crate::{
  observable::{CoreObservable, Observable},
  observer::{BoxedObserver, Observer},
  subscription::Subscription,
  value::Value,
};

pub struct TakeLastOp {
  source: Observable,
  count: usize,
}

impl TakeLastOp {
  pub(crate) fn observable(source: Observable, count: usize) -> Observable {
    Observable::new(Self { source, count })
  }
}

impl CoreObservable for TakeLastOp {
  fn actual_subscribe(&self, observer: BoxedObserver) -> Subscription {
    let observer = TakeLastObserver {
      observer,
      count: self.count,
      queue: VecDeque::with_capacity(self.count),
    };
    self.source.actual_subscribe(Box::new(observer))
  }
}

struct TakeLastObserver {
  observer: BoxedObserver,
  count: usize,
  queue: VecDeque<Value>,
}

impl Observer for TakeLastObserver {
  fn next(&mut self, value: Value) {
    if self.count == 0 {
      return;
    }
    if self.queue.len() == self.count {
      self.queue.pop_front();
    }
    self.queue.push_back(value);
  }

  fn error(self, err: crate::error::RxError) { self.observer.error(err) }

  fn complete(mut self) {
    for value in self.queue.drain(..) {
      if self.observer.is_closed() {
        return;
      }
      self.observer.next(value);
    }
    self.observer.complete();
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
