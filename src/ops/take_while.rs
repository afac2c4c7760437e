use crate::{
  observable::{CoreObservable, Observable},
  observer::{BoxedObserver, Observer},
  ops::ValueFn,
  subscription::Subscription,
  value::Value,
};

pub struct TakeWhileOp {
  source: Observable,
  pred: ValueFn<bool>,
}

impl TakeWhileOp {
  pub(crate) fn observable(source: Observable, pred: ValueFn<bool>) -> Observable {
    Observable::new(Self { source, pred })
  }
}

impl CoreObservable for TakeWhileOp {
  fn actual_subscribe(&self, observer: BoxedObserver) -> Subscription {
    let observer = TakeWhileObserver { observer: Some(observer), pred: self.pred.clone() };
    self.source.actual_subscribe(Box::new(observer))
  }
}

struct TakeWhileObserver {
  observer: Option<BoxedObserver>,
  pred: ValueFn<bool>,
}

impl Observer for TakeWhileObserver {
  fn next(&mut self, value: Value) {
    if self.observer.is_closed() {
      return;
    }
    match (self.pred)(value.clone()) {
      Ok(true) => self.observer.next(value),
      Ok(false) => self.observer.take().complete(),
      Err(err) => self.observer.take().error(err),
    }
  }

  forward_terminal!();
}
