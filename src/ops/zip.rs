use std::collections::VecDeque;

use crate::{
  error::RxError,
  observable::{CoreObservable, Observable},
  observer::{BoxedObserver, Observer},
  ops::sources::{self, Combine, Downstream, IntoSources},
  rc::MutRc,
  subscription::Subscription,
  value::Value,
};

/// Pairs the emissions of its sources by position.
pub struct ZipOp {
  sources: Vec<Observable>,
  combine: Combine,
}

impl ZipOp {
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

impl CoreObservable for ZipOp {
  fn actual_subscribe(&self, observer: BoxedObserver) -> Subscription {
    let subscription = Subscription::default();
    let state = MutRc::own(ZipState {
      downstream: Downstream::new(observer, subscription.clone()),
      buffers: vec![VecDeque::new(); self.sources.len()],
      completed: vec![false; self.sources.len()],
    });
    sources::subscribe_each(self.sources.iter().enumerate(), &subscription, |index| {
      Box::new(ZipObserver { index, state: state.clone(), combine: self.combine.clone() })
    });
    subscription
  }
}

struct ZipState {
  downstream: Downstream,
  buffers: Vec<VecDeque<Value>>,
  completed: Vec<bool>,
}

impl ZipState {
  /// No further tuple can form once a finished source has nothing buffered.
  fn exhausted(&self) -> bool {
    self.buffers.iter().zip(&self.completed).any(|(buffer, done)| *done && buffer.is_empty())
  }
}

struct ZipObserver {
  index: usize,
  state: MutRc<ZipState>,
  combine: Combine,
}

impl Observer for ZipObserver {
  fn next(&mut self, value: Value) {
    let mut state = self.state.rc_deref_mut();
    if state.downstream.is_closed() {
      return;
    }
    state.buffers[self.index].push_back(value);
    if state.buffers.iter().any(VecDeque::is_empty) {
      return;
    }
    let values: Vec<Value> = state.buffers.iter_mut().filter_map(VecDeque::pop_front).collect();
    match self.combine.call(&values) {
      Ok(combined) => state.downstream.next(combined),
      Err(err) => {
        let finish = state.downstream.finish();
        drop(state);
        finish.error(err);
        return;
      }
    }
    if state.exhausted() {
      let finish = state.downstream.finish();
      drop(state);
      finish.complete();
    }
  }

  fn error(self, err: RxError) {
    let finish = self.state.rc_deref_mut().downstream.finish();
    finish.error(err);
  }

  fn complete(self) {
    let mut state = self.state.rc_deref_mut();
    state.completed[self.index] = true;
    if state.exhausted() {
      let finish = state.downstream.finish();
      drop(state);
      finish.complete();
    }
  }

  fn is_closed(&self) -> bool { self.state.rc_deref().downstream.is_closed() }
}
