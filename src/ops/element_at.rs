use crate::{
  observable::{CoreObservable, Observable},
  observer::{BoxedObserver, Observer},
  subscription::Subscription,
  value::Value,
};

pub struct ElementAtOp {
  source: Observable,
  index: usize,
}

impl ElementAtOp {
  pub(crate) fn observable(source: Observable, index: usize) -> Observable {
    Observable::new(Self { source, index })
  }
}

impl CoreObservable for ElementAtOp {
  fn actual_subscribe(&self, observer: BoxedObserver) -> Subscription {
    let observer = ElementAtObserver { observer: Some(observer), remaining: self.index };
    self.source.actual_subscribe(Box::new(observer))
  }
}

struct ElementAtObserver {
  observer: Option<BoxedObserver>,
  remaining: usize,
}

impl Observer for ElementAtObserver {
  fn next(&mut self, value: Value) {
    if self.remaining > 0 {
      self.remaining -= 1;
    } else if let Some(mut observer) = self.observer.take() {
      observer.next(value);
      observer.complete();
    }
  }

  forward_terminal!();
}
