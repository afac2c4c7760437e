use crate::{
  observable::{CoreObservable, Observable},
  observer::{BoxedObserver, Observer},
  ops::ValueFn,
  subscription::Subscription,
  value::Value,
};

pub struct FilterOp {
  source: Observable,
  pred: ValueFn<bool>,
}

impl FilterOp {
  pub(crate) fn observable(source: Observable, pred: ValueFn<bool>) -> Observable {
    Observable::new(Self { source, pred })
  }
}

impl CoreObservable for FilterOp {
  fn actual_subscribe(&self, observer: BoxedObserver) -> Subscription {
    let observer = FilterObserver { observer: Some(observer), pred: self.pred.clone() };
    self.source.actual_subscribe(Box::new(observer))
  }
}

struct FilterObserver {
  observer: Option<BoxedObserver>,
  pred: ValueFn<bool>,
}

impl Observer for FilterObserver {
  fn next(&mut self, value: Value) {
    if self.observer.is_closed() {
      return;
    }
    match (self.pred)(value.clone()) {
      Ok(true) => self.observer.next(value),
      Ok(false) => {}
      Err(err) => self.observer.take().error(err),
    }
  }

  forward_terminal!();
}
