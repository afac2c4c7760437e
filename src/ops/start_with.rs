use std::rc::Rc;

use crate::{
  observable::{CoreObservable, Observable},
  observer::{BoxedObserver, Observer},
  subscription::Subscription,
  value::Value,
};

pub struct StartWithOp {
  source: Observable,
  values: Rc<[Value]>,
}

impl StartWithOp {
  pub(crate) fn observable(source: Observable, values: Rc<[Value]>) -> Observable {
    Observable::new(Self { source, values })
  }
}

impl CoreObservable for StartWithOp {
  fn actual_subscribe(&self, mut observer: BoxedObserver) -> Subscription {
    for value in self.values.iter() {
      if observer.is_closed() {
        return Subscription::closed();
      }
      observer.next(value.clone());
    }
    self.source.actual_subscribe(observer)
  }
}

#[cfg(test)]
mod tests {
  use crate::{prelude::*, test_util::record};

  #[test]
  fn prepends_values() {
    let r = record(Observable::from_iter([3, 4]).start_with([1, 2]));
    assert_eq!(r.values::<i32>(), vec![1, 2, 3, 4]);
    assert!(r.is_completed());
  }

  #[test]
  fn prefix_arrives_before_subscription() {
    let subject = Subject::default();
    let r = record(subject.clone().start_with([String::from("first")]));
    assert_eq!(r.values::<String>(), vec!["first"]);
    assert_eq!(subject.observer_count(), 1);
    subject.next(String::from("second"));
    assert_eq!(r.values::<String>(), vec!["first", "second"]);
  }
}
