use crate::{
  observable::{CoreObservable, Observable},
  observer::{BoxedObserver, Observer},
  subscription::Subscription,
  value::Value,
};

pub struct SkipOp {
  source: Observable,
  count: usize,
}

impl SkipOp {
  pub(crate) fn observable(source: Observable, count: usize) -> Observable {
    Observable::new(Self { source, count })
  }
}

impl CoreObservable for SkipOp {
  fn actual_subscribe(&self, observer: BoxedObserver) -> Subscription {
    let observer = SkipObserver { observer, remaining: self.count };
    self.source.actual_subscribe(Box::new(observer))
  }
}

struct SkipObserver {
  observer: BoxedObserver,
  remaining: usize,
}

impl Observer for SkipObserver {
  fn next(&mut self, value: Value) {
    if self.remaining == 0 {
      self.observer.next(value);
    } else {
      self.remaining -= 1;
    }
  }

  forward_terminal!();
}

#[cfg(test)]
mod tests {
  use crate::{prelude::*, test_util::record};

  #[test]
  fn drops_leading_values() {
    let r = record(Observable::range(4, 9, 1).skip(4));
    assert_eq!(r.values::<i32>(), vec![8, 9]);
    assert!(r.is_completed());
  }

  #[test]
  fn skip_more_than_length() {
    let r = record(Observable::from_iter(0..3).skip(10));
    assert!(r.values::<i32>().is_empty());
    assert!(r.is_completed());
  }
}
