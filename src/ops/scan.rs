use crate::{
  observable::{CoreObservable, Observable},
  observer::{BoxedObserver, Observer},
  ops::AccumulatorFn,
  subscription::Subscription,
  value::Value,
};

pub struct ScanOp {
  source: Observable,
  seed: Value,
  func: AccumulatorFn,
}

impl ScanOp {
  pub(crate) fn observable(source: Observable, seed: Value, func: AccumulatorFn) -> Observable {
    Observable::new(Self { source, seed, func })
  }
}

impl CoreObservable for ScanOp {
  fn actual_subscribe(&self, observer: BoxedObserver) -> Subscription {
    let observer =
      ScanObserver { observer: Some(observer), acc: self.seed.clone(), func: self.func.clone() };
    self.source.actual_subscribe(Box::new(observer))
  }
}

struct ScanObserver {
  observer: Option<BoxedObserver>,
  acc: Value,
  func: AccumulatorFn,
}

impl Observer for ScanObserver {
  fn next(&mut self, value: Value) {
    if self.observer.is_closed() {
      return;
    }
    match (self.func)(&self.acc, value) {
      Ok(acc) => {
        self.acc = acc.clone();
        self.observer.next(acc);
      }
      Err(err) => self.observer.take().error(err),
    }
  }

  forward_terminal!();
}
