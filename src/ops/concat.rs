use std::rc::Rc;

use crate::{
  error::RxError,
  observable::{CoreObservable, Observable},
  observer::{BoxedObserver, Observer},
  ops::sources::IntoSources,
  subscription::Subscription,
  value::Value,
};

pub struct ConcatOp {
  sources: Rc<[Observable]>,
}

impl ConcatOp {
  pub(crate) fn observable(first: Observable, others: impl IntoSources) -> Observable {
    let sources = std::iter::once(first).chain(others.into_sources()).collect();
    Observable::new(Self { sources })
  }
}

impl CoreObservable for ConcatOp {
  fn actual_subscribe(&self, observer: BoxedObserver) -> Subscription {
    let subscription = Subscription::default();
    ConcatObserver { observer, sources: self.sources.clone(), index: 0, subscription }.start()
  }
}

/// Hands the downstream observer from one source to the next.
struct ConcatObserver {
  observer: BoxedObserver,
  sources: Rc<[Observable]>,
  index: usize,
  subscription: Subscription,
}

impl ConcatObserver {
  fn start(self) -> Subscription {
    let subscription = self.subscription.clone();
    if !subscription.is_closed() {
      let source = self.sources[self.index].clone();
      subscription.add(source.actual_subscribe(Box::new(self)));
    }
    subscription
  }
}

impl Observer for ConcatObserver {
  fn next(&mut self, value: Value) { self.observer.next(value) }

  fn error(self, err: RxError) { self.observer.error(err) }

  fn complete(self) {
    if self.index + 1 < self.sources.len() {
      ConcatObserver { index: self.index + 1, ..self }.start();
    } else {
      self.observer.complete();
    }
  }

  fn is_closed(&self) -> bool { self.subscription.is_closed() || self.observer.is_closed() }
}
