use crate::{
  observable::{CoreObservable, Observable},
  observer::{BoxedObserver, Observer},
  ops::ValueFn,
  subscription::Subscription,
  value::Value,
};

/// Backs both `map` and `try_map`: the function may fail, and its error ends
/// the stream.
pub struct MapOp {
  source: Observable,
  func: ValueFn<Value>,
}

impl MapOp {
  pub(crate) fn observable(source: Observable, func: ValueFn<Value>) -> Observable {
    Observable::new(Self { source, func })
  }
}

impl CoreObservable for MapOp {
  fn actual_subscribe(&self, observer: BoxedObserver) -> Subscription {
    let observer = MapObserver { observer: Some(observer), func: self.func.clone() };
    self.source.actual_subscribe(Box::new(observer))
  }
}

struct MapObserver {
  observer: Option<BoxedObserver>,
  func: ValueFn<Value>,
}

impl Observer for MapObserver {
  fn next(&mut self, value: Value) {
    if self.observer.is_closed() {
      return;
    }
    match (self.func)(value) {
      Ok(mapped) => self.observer.next(mapped),
      Err(err) => self.observer.take().error(err),
    }
  }

  forward_terminal!();
}
