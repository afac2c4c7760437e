use crate::{
  error::RxError,
  observable::{CoreObservable, Observable},
  observer::{BoxedObserver, Observer},
  ops::sources::{self, Downstream, IntoSources},
  rc::MutRc,
  subscription::Subscription,
  value::Value,
};

/// Merges the emissions of any number of sources into one stream.
pub struct MergeOp {
  sources: Vec<Observable>,
}

impl MergeOp {
  pub(crate) fn observable(first: Observable, others: impl IntoSources) -> Observable {
    let sources = std::iter::once(first).chain(others.into_sources()).collect();
    Observable::new(Self { sources })
  }
}

impl CoreObservable for MergeOp {
  fn actual_subscribe(&self, observer: BoxedObserver) -> Subscription {
    let subscription = Subscription::default();
    let state = MutRc::own(MergeState {
      downstream: Downstream::new(observer, subscription.clone()),
      active: self.sources.len(),
    });
    sources::subscribe_each(self.sources.iter().enumerate(), &subscription, |_| {
      Box::new(MergeObserver { state: state.clone() })
    });
    subscription
  }
}

struct MergeState {
  downstream: Downstream,
  active: usize,
}

struct MergeObserver {
  state: MutRc<MergeState>,
}

impl Observer for MergeObserver {
  fn next(&mut self, value: Value) { self.state.rc_deref_mut().downstream.next(value) }

  fn error(self, err: RxError) {
    let finish = self.state.rc_deref_mut().downstream.finish();
    finish.error(err);
  }

  fn complete(self) {
    let mut state = self.state.rc_deref_mut();
    state.active -= 1;
    if state.active == 0 {
      let finish = state.downstream.finish();
      drop(state);
      finish.complete();
    }
  }

  fn is_closed(&self) -> bool { self.state.rc_deref().downstream.is_closed() }
}
