use std::rc::Rc;

use crate::{
  error::Result,
  observable::{CoreObservable, Observable},
  observer::{BoxedObserver, Observer},
  subscription::Subscription,
  value::Value,
};

pub(crate) type EqFn = Rc<dyn Fn(&Value, &Value) -> Result<bool>>;

pub struct DistinctUntilChangedOp {
  source: Observable,
  eq: EqFn,
}

impl DistinctUntilChangedOp {
  pub(crate) fn observable(source: Observable, eq: EqFn) -> Observable {
    Observable::new(Self { source, eq })
  }
}

impl CoreObservable for DistinctUntilChangedOp {
  fn actual_subscribe(&self, observer: BoxedObserver) -> Subscription {
    let observer =
      DistinctUntilChangedObserver { observer: Some(observer), eq: self.eq.clone(), last: None };
    self.source.actual_subscribe(Box::new(observer))
  }
}

struct DistinctUntilChangedObserver {
  observer: Option<BoxedObserver>,
  eq: EqFn,
  last: Option<Value>,
}

impl Observer for DistinctUntilChangedObserver {
  fn next(&mut self, value: Value) {
    if let Some(last) = &self.last {
      match (self.eq)(last, &value) {
        Ok(true) => return,
        Ok(false) => {}
        Err(err) => return self.observer.take().error(err),
      }
    }
    self.last = Some(value.clone());
    self.observer.next(value);
  }

  forward_terminal!();
}

#[cfg(test)]
mod tests {
  use crate::{prelude::*, test_util::record};

  #[derive(Clone, PartialEq, Debug)]
  struct Point {
    x: i32,
    y: i32,
  }

  crate::impl_value_type!(Point);

  #[test]
  fn suppresses_consecutive_repeats() {
    let r = record(Observable::from_iter([3, 3, 3, 17, 3, 3, 4, 4]).distinct_until_changed());
    assert_eq!(r.values::<i32>(), vec![3, 17, 3, 4]);
    assert!(r.is_completed());
  }

  #[test]
  fn compares_custom_payloads() {
    let p = |x, y| Point { x, y };
    let r = record(
      Observable::from_iter([p(27, 12), p(27, 12), p(12, 27), p(27, 12)]).distinct_until_changed(),
    );
    assert_eq!(r.values::<Point>(), vec![p(27, 12), p(12, 27), p(27, 12)]);
  }

  #[test]
  fn numbers_and_numeric_strings_repeat() {
    let source = Observable::from_iter([
      Value::wrap(3),
      Value::wrap(3),
      Value::from("3"),
      Value::wrap(3.0),
      Value::wrap(5),
      Value::from("5"),
      Value::wrap(3),
    ]);
    let r = record(source.distinct_until_changed());
    assert_eq!(r.values::<Value>(), vec![Value::wrap(3), Value::wrap(5), Value::wrap(3)]);
  }

  #[test]
  fn non_numeric_types_stay_distinct() {
    let source = Observable::from_iter([Value::wrap(true), Value::from("true"), Value::wrap(1)]);
    let r = record(source.distinct_until_changed());
    assert_eq!(r.values::<Value>().len(), 3);
  }

  #[test]
  fn custom_equivalence() {
    let r = record(
      Observable::from_iter(["a", "A", "b"].map(String::from))
        .distinct_until_changed_by(|a: &String, b: &String| a.eq_ignore_ascii_case(b)),
    );
    assert_eq!(r.values::<String>(), vec!["a", "b"]);
  }
}
