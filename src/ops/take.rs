use crate::{
  observable::{CoreObservable, Observable},
  observer::{BoxedObserver, Observer},
  subscription::Subscription,
  value::Value,
};

pub struct TakeOp {
  source: Observable,
  count: usize,
}

impl TakeOp {
  pub(crate) fn observable(source: Observable, count: usize) -> Observable {
    Observable::new(Self { source, count })
  }
}

impl CoreObservable for TakeOp {
  fn actual_subscribe(&self, observer: BoxedObserver) -> Subscription {
    if self.count == 0 {
      observer.complete();
      return Subscription::closed();
    }
    let observer = TakeObserver { observer: Some(observer), remaining: self.count };
    self.source.actual_subscribe(Box::new(observer))
  }
}

struct TakeObserver {
  observer: Option<BoxedObserver>,
  remaining: usize,
}

impl Observer for TakeObserver {
  fn next(&mut self, value: Value) {
    if self.observer.is_closed() {
      return;
    }
    self.remaining -= 1;
    self.observer.next(value);
    if self.remaining == 0 {
      self.observer.take().complete();
    }
  }

  forward_terminal!();
}

#[cfg(test)]
mod tests {
  use crate::{prelude::*, test_util::record};

  #[test]
  fn base_function() {
    let r = record(Observable::range(0, 100, 1).take(5));
    assert_eq!(r.values::<i32>(), vec![0, 1, 2, 3, 4]);
    assert!(r.is_completed());
  }

  #[test]
  fn take_zero_completes_without_subscribing() {
    let subject = Subject::default();
    let r = record(subject.clone().take(0));
    assert!(r.is_completed());
    assert_eq!(subject.observer_count(), 0);
  }

  #[test]
  fn unsubscribes_upstream_when_done() {
    let subject = Subject::default();
    let r = record(subject.clone().take(2));
    subject.next(1);
    subject.next(2);
    subject.next(3);
    assert_eq!(r.values::<i32>(), vec![1, 2]);
    assert!(r.is_completed());
    assert_eq!(subject.observer_count(), 0);
  }
}
