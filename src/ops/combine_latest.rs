use crate::{
  error::RxError,
  observable::{CoreObservable, Observable},
  observer::{BoxedObserver, Observer},
  ops::sources::{self, Combine, Downstream, IntoSources},
  rc::MutRc,
  subscription::Subscription,
  value::Value,
};

pub struct CombineLatestOp {
  sources: Vec<Observable>,
  combine: Combine,
}

impl CombineLatestOp {
  pub(crate) fn observable(
    first: Observable,
    others: impl IntoSources,
    combine: Combine,
  ) -> Observable {
    let sources = sources::gather(first, others).and_then(|sources| {
      combine.check(sources.len())?;
      Ok(sources)
    });
    match sources {
      Ok(sources) => Observable::new(Self { sources, combine }),
      Err(err) => Observable::throw(err),
    }
  }
}

impl CoreObservable for CombineLatestOp {
  fn actual_subscribe(&self, observer: BoxedObserver) -> Subscription {
    let subscription = Subscription::default();
    let state = MutRc::own(CombineLatestState {
      downstream: Downstream::new(observer, subscription.clone()),
      latest: vec![None; self.sources.len()],
      completed: 0,
    });
    sources::subscribe_each(self.sources.iter().enumerate(), &subscription, |index| {
      Box::new(CombineLatestObserver { index, state: state.clone(), combine: self.combine.clone() })
    });
    subscription
  }
}

struct CombineLatestState {
  downstream: Downstream,
  latest: Vec<Option<Value>>,
  completed: usize,
}

struct CombineLatestObserver {
  index: usize,
  state: MutRc<CombineLatestState>,
  combine: Combine,
}

impl Observer for CombineLatestObserver {
  fn next(&mut self, value: Value) {
    let mut state = self.state.rc_deref_mut();
    if state.downstream.is_closed() {
      return;
    }
    state.latest[self.index] = Some(value);
    if !state.latest.iter().all(Option::is_some) {
      return;
    }
    let values: Vec<Value> = state.latest.iter().flatten().cloned().collect();
    match self.combine.call(&values) {
      Ok(combined) => state.downstream.next(combined),
      Err(err) => {
        let finish = state.downstream.finish();
        drop(state);
        finish.error(err);
      }
    }
  }

  fn error(self, err: RxError) {
    let finish = self.state.rc_deref_mut().downstream.finish();
    finish.error(err);
  }

  fn complete(self) {
    let mut state = self.state.rc_deref_mut();
    state.completed += 1;
    if state.completed == state.latest.len() {
      let finish = state.downstream.finish();
      drop(state);
      finish.complete();
    }
  }

  fn is_closed(&self) -> bool { self.state.rc_deref().downstream.is_closed() }
}

#[cfg(test)]
mod tests {
  use crate::{prelude::*, test_util::record};

  #[test]
  fn waits_for_every_source() {
    let (a, b) = (Subject::default(), Subject::default());
    let r = record(a.clone().combine_latest_with(&b, |x: i32, y: i32| x + y));
    a.next(1);
    a.next(2);
    assert!(r.values::<i32>().is_empty());
    b.next(10);
    a.next(3);
    b.next(20);
    assert_eq!(r.values::<i32>(), vec![12, 13, 23]);
  }

  #[test]
  fn default_emission_unwraps_as_tuple() {
    let r = record(Observable::just(1).combine_latest(Observable::just(String::from("a"))));
    assert_eq!(r.values::<(i32, String)>(), vec![(1, "a".to_owned())]);
    assert!(r.is_completed());
  }

  #[test]
  fn completes_after_all_sources() {
    let (a, b) = (Subject::default(), Subject::default());
    let r = record(a.clone().combine_latest(&b));
    a.complete();
    assert!(!r.is_completed());
    b.complete();
    assert!(r.is_completed());
  }

  #[test]
  fn error_cancels_other_sources() {
    let (a, b) = (Subject::default(), Subject::default());
    let r = record(a.clone().combine_latest(&b));
    assert_eq!(b.observer_count(), 1);
    a.error(RxError::msg("boom"));
    assert!(matches!(r.error(), Some(RxError::Message(m)) if m == "boom"));
    assert_eq!(b.observer_count(), 0);
    assert!(r.subscription.is_closed());
  }

  #[test]
  fn short_combiner_reads_leading_values() {
    let (a, b, c) = (Subject::default(), Subject::default(), Subject::default());
    let r = record(a.clone().combine_latest_with((&b, &c), |x: i32, y: i32| x * y));
    a.next(2);
    b.next(3);
    assert!(r.values::<i32>().is_empty());
    c.next(true);
    assert_eq!(r.values::<i32>(), vec![6]);
  }

  #[test]
  fn combiner_wider_than_sources() {
    let sum = |a: i32, b: i32, c: i32| a + b + c;
    let r = record(Observable::just(1).combine_latest_with(Observable::just(2), sum));
    assert!(matches!(r.error(), Some(RxError::ArityMismatch { expected: 3, actual: 2 })));
  }

  #[test]
  fn too_many_sources() {
    let others: Vec<Observable> = (0..8).map(Observable::just).collect();
    let r = record(Observable::just(0).combine_latest(others));
    assert!(matches!(r.error(), Some(RxError::ArityExceeded { max: 8, actual: 9 })));
  }

  #[test]
  fn combiner_type_mismatch() {
    let text = Observable::just(String::from("x"));
    let r = record(text.combine_latest_with(Observable::just(1), |a: i32, b: i32| a + b));
    assert!(matches!(r.error(), Some(RxError::TypeMismatch { expected: "i32", .. })));
  }
}
