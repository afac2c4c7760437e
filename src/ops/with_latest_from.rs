use crate::{
  error::RxError,
  observable::{CoreObservable, Observable},
  observer::{BoxedObserver, Observer},
  ops::sources::{self, Combine, Downstream, IntoSources},
  rc::MutRc,
  subscription::Subscription,
  value::Value,
};

/// The first source drives emission; the others only supply their latest
/// value.
pub struct WithLatestFromOp {
  sources: Vec<Observable>,
  combine: Combine,
}

impl WithLatestFromOp {
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

impl CoreObservable for WithLatestFromOp {
  fn actual_subscribe(&self, observer: BoxedObserver) -> Subscription {
    let subscription = Subscription::default();
    let state = MutRc::own(WithLatestFromState {
      downstream: Downstream::new(observer, subscription.clone()),
      latest: vec![None; self.sources.len()],
    });
    // The others go first so that synchronous values are in place before the
    // receiver starts emitting.
    let indexed = self.sources.iter().enumerate();
    let order = indexed.clone().skip(1).chain(indexed.take(1));
    sources::subscribe_each(order, &subscription, |index| {
      let combine = self.combine.clone();
      Box::new(WithLatestFromObserver { index, state: state.clone(), combine })
    });
    subscription
  }
}

struct WithLatestFromState {
  downstream: Downstream,
  /// Slot 0 stays empty; the receiver's value is used as it arrives.
  latest: Vec<Option<Value>>,
}

struct WithLatestFromObserver {
  index: usize,
  state: MutRc<WithLatestFromState>,
  combine: Combine,
}

impl Observer for WithLatestFromObserver {
  fn next(&mut self, value: Value) {
    let mut state = self.state.rc_deref_mut();
    if state.downstream.is_closed() {
      return;
    }
    if self.index != 0 {
      state.latest[self.index] = Some(value);
      return;
    }
    let others = &state.latest[1..];
    if !others.iter().all(Option::is_some) {
      return;
    }
    let values: Vec<Value> =
      std::iter::once(value).chain(others.iter().flatten().cloned()).collect();
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
    if self.index == 0 {
      let finish = self.state.rc_deref_mut().downstream.finish();
      finish.complete();
    }
  }

  fn is_closed(&self) -> bool { self.state.rc_deref().downstream.is_closed() }
}

#[cfg(test)]
mod tests {
  use crate::{prelude::*, test_util::record};

  #[test]
  fn emits_only_on_receiver() {
    let (a, b) = (Subject::default(), Subject::default());
    let r = record(a.clone().with_latest_from_with(&b, |x: i32, y: i32| x * 10 + y));
    a.next(1);
    b.next(2);
    b.next(3);
    assert!(r.values::<i32>().is_empty());
    a.next(4);
    a.next(5);
    b.next(6);
    assert_eq!(r.values::<i32>(), vec![43, 53]);
  }

  #[test]
  fn synchronous_others_are_ready() {
    let other = Observable::just(String::from("x"));
    let r = record(Observable::from_iter(1..4).with_latest_from(other));
    let expected: Vec<(i32, String)> = (1..4).map(|i| (i, "x".to_owned())).collect();
    assert_eq!(r.values::<(i32, String)>(), expected);
    assert!(r.is_completed());
  }

  #[test]
  fn completes_with_receiver_only() {
    let (a, b) = (Subject::default(), Subject::default());
    let r = record(a.clone().with_latest_from(&b));
    b.complete();
    assert!(!r.is_completed());
    a.complete();
    assert!(r.is_completed());
  }

  #[test]
  fn other_source_error_propagates() {
    let (a, b) = (Subject::default(), Subject::default());
    let r = record(a.clone().with_latest_from(&b));
    b.error(RxError::msg("other"));
    assert!(r.error().is_some());
    assert_eq!(a.observer_count(), 0);
  }
}
