use crate::{
  observable::{CoreObservable, Observable},
  observer::{BoxedObserver, Observer},
  ops::AccumulatorFn,
  subscription::Subscription,
  value::Value,
};

pub struct ReduceOp {
  source: Observable,
  seed: Value,
  func: AccumulatorFn,
}

impl ReduceOp {
  pub(crate) fn observable(source: Observable, seed: Value, func: AccumulatorFn) -> Observable {
    Observable::new(Self { source, seed, func })
  }
}

impl CoreObservable for ReduceOp {
  fn actual_subscribe(&self, observer: BoxedObserver) -> Subscription {
    let observer =
      ReduceObserver { observer: Some(observer), acc: self.seed.clone(), func: self.func.clone() };
    self.source.actual_subscribe(Box::new(observer))
  }
}

struct ReduceObserver {
  observer: Option<BoxedObserver>,
  acc: Value,
  func: AccumulatorFn,
}

impl Observer for ReduceObserver {
  fn next(&mut self, value: Value) {
    if self.observer.is_closed() {
      return;
    }
    match (self.func)(&self.acc, value) {
      Ok(acc) => self.acc = acc,
      Err(err) => self.observer.take().error(err),
    }
  }

  fn error(self, err: crate::error::RxError) { self.observer.error(err) }

  fn complete(self) {
    let mut observer = self.observer;
    observer.next(self.acc);
    observer.complete();
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
