use crate::{
  observable::{CoreObservable, Observable},
  observer::{BoxedObserver, Observer},
  ops::ValueFn,
  subscription::Subscription,
  value::Value,
};

pub struct SkipWhileOp {
  source: Observable,
  pred: ValueFn<bool>,
}

impl SkipWhileOp {
  pub(crate) fn observable(source: Observable, pred: ValueFn<bool>) -> Observable {
    Observable::new(Self { source, pred })
  }
}

impl CoreObservable for SkipWhileOp {
  fn actual_subscribe(&self, observer: BoxedObserver) -> Subscription {
    let observer =
      SkipWhileObserver { observer: Some(observer), pred: self.pred.clone(), skipping: true };
    self.source.actual_subscribe(Box::new(observer))
  }
}

struct SkipWhileObserver {
  observer: Option<BoxedObserver>,
  pred: ValueFn<bool>,
  skipping: bool,
}

impl Observer for SkipWhileObserver {
  fn next(&mut self, value: Value) {
    if self.skipping {
      match (self.pred)(value.clone()) {
        Ok(true) => return,
        Ok(false) => self.skipping = false,
        Err(err) => return self.observer.take().error(err),
      }
    }
    self.observer.next(value);
  }

  forward_terminal!();
}

#[cfg(test)]
mod tests {
  use crate::{prelude::*, test_util::record};

  #[test]
  fn relays_everything_after_first_failure() {
    let r = record(Observable::from_iter([1, 2, 5, 1, 6]).skip_while(|v: &i32| *v < 3));
    assert_eq!(r.values::<i32>(), vec![5, 1, 6]);
    assert!(r.is_completed());
  }
}
