use crate::{
  error::RxError,
  observable::{CoreObservable, Observable},
  observer::{BoxedObserver, Observer},
  ops::sources::Downstream,
  rc::MutRc,
  subscription::Subscription,
  value::Value,
};

/// Subscribes to every observable the source emits and relays all of their
/// values.
pub struct MergeAllOp {
  source: Observable,
}

impl MergeAllOp {
  pub(crate) fn observable(source: Observable) -> Observable { Observable::new(Self { source }) }
}

impl CoreObservable for MergeAllOp {
  fn actual_subscribe(&self, observer: BoxedObserver) -> Subscription {
    let subscription = Subscription::default();
    let state = MutRc::own(MergeAllState {
      downstream: Downstream::new(observer, subscription.clone()),
      active: 0,
      outer_completed: false,
    });
    let outer = OuterObserver { state, group: subscription.clone() };
    subscription.add(self.source.actual_subscribe(Box::new(outer)));
    subscription
  }
}

struct MergeAllState {
  downstream: Downstream,
  active: usize,
  outer_completed: bool,
}

impl MergeAllState {
  fn is_done(&self) -> bool { self.outer_completed && self.active == 0 }
}

struct OuterObserver {
  state: MutRc<MergeAllState>,
  group: Subscription,
}

impl Observer for OuterObserver {
  fn next(&mut self, value: Value) {
    let inner = match value.unwrap::<Observable>() {
      Ok(inner) => inner,
      Err(err) => {
        let finish = self.state.rc_deref_mut().downstream.finish();
        finish.error(err);
        return;
      }
    };
    {
      let mut state = self.state.rc_deref_mut();
      if state.downstream.is_closed() {
        return;
      }
      state.active += 1;
    }
    // Per-inner handle; a completed inner leaves the group.
    let inner_subscription = Subscription::default();
    self.group.add(inner_subscription.clone());
    let observer =
      InnerObserver { state: self.state.clone(), subscription: inner_subscription.clone() };
    inner_subscription.add(inner.actual_subscribe(Box::new(observer)));
  }

  fn error(self, err: RxError) {
    let finish = self.state.rc_deref_mut().downstream.finish();
    finish.error(err);
  }

  fn complete(self) {
    let mut state = self.state.rc_deref_mut();
    state.outer_completed = true;
    if state.is_done() {
      let finish = state.downstream.finish();
      drop(state);
      finish.complete();
    }
  }

  fn is_closed(&self) -> bool { self.state.rc_deref().downstream.is_closed() }
}

struct InnerObserver {
  state: MutRc<MergeAllState>,
  subscription: Subscription,
}

impl Observer for InnerObserver {
  fn next(&mut self, value: Value) { self.state.rc_deref_mut().downstream.next(value) }

  fn error(self, err: RxError) {
    let finish = self.state.rc_deref_mut().downstream.finish();
    finish.error(err);
  }

  fn complete(self) {
    self.subscription.unsubscribe();
    let mut state = self.state.rc_deref_mut();
    state.active -= 1;
    if state.is_done() {
      let finish = state.downstream.finish();
      drop(state);
      finish.complete();
    }
  }

  fn is_closed(&self) -> bool { self.state.rc_deref().downstream.is_closed() }
}

#[cfg(test)]
mod tests {
  use std::{cell::Cell, rc::Rc};

  use super::MergeAllOp;
  use crate::{
    prelude::*,
    subscriber::{typed_next, ErrorHandler, FnObserver},
    test_util::record,
  };

  #[test]
  fn flat_map_flattens_every_inner() {
    let r = record(Observable::from_iter(1..4).flat_map(|n: i32| Observable::from_iter(0..n)));
    assert_eq!(r.values::<i32>(), vec![0, 0, 1, 0, 1, 2]);
    assert!(r.is_completed());
  }

  #[test]
  fn interleaves_live_inners() {
    let (outer, a, b) = (Subject::default(), Subject::default(), Subject::default());
    let r = record(outer.clone().merge_all());
    outer.next(a.clone().into_observable());
    a.next(1);
    outer.next(b.clone().into_observable());
    b.next(2);
    a.next(3);
    assert_eq!(r.values::<i32>(), vec![1, 2, 3]);

    outer.complete();
    a.complete();
    assert!(!r.is_completed());
    b.complete();
    assert!(r.is_completed());
  }

  #[test]
  fn inner_error_cancels_everything() {
    let (outer, a, b) = (Subject::default(), Subject::default(), Subject::default());
    let r = record(outer.clone().merge_all());
    outer.next(a.clone().into_observable());
    outer.next(b.clone().into_observable());
    b.error(RxError::msg("inner"));
    assert!(r.error().is_some());
    assert_eq!(outer.observer_count() + a.observer_count(), 0);
  }

  #[test]
  fn completed_inners_are_released() {
    let outer = Subject::default();
    let seen = Rc::new(Cell::new(0));
    let c_seen = seen.clone();
    let next = typed_next(move |_: i32| c_seen.set(c_seen.get() + 1));
    let observer = FnObserver::new(next, ErrorHandler::default(), None);
    let merged = MergeAllOp::observable(outer.clone().into_observable());
    let group = merged.actual_subscribe(Box::new(observer));
    for i in 0..100 {
      outer.next(Observable::just(i));
    }
    assert_eq!(seen.get(), 100);
    // The outer subscription plus at most the latest finished inner.
    assert!(group.teardown_size() <= 2);

    let live = Subject::default();
    outer.next(live.clone().into_observable());
    live.complete();
    assert_eq!(live.observer_count(), 0);
    assert!(!group.is_closed());
  }

  #[test]
  fn flat_map_to_subject() {
    let inner = Subject::default();
    let c_inner = inner.clone();
    let r = record(Observable::just(String::from("hello")).flat_map(move |greeting: String| {
      c_inner.clone().map(move |suffix: String| format!("{}{}", greeting.to_uppercase(), suffix))
    }));
    inner.next(String::from("!"));
    assert_eq!(r.values::<String>(), vec!["HELLO!"]);
    assert!(!r.is_completed());
  }
}
