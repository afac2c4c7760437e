use crate::{
  error::RxError,
  observable::{CoreObservable, Observable},
  observer::{BoxedObserver, Observer},
  ops::sources::Downstream,
  rc::MutRc,
  subscription::Subscription,
  value::Value,
};

/// Follows the most recent observable emitted by the source.
pub struct SwitchOnNextOp {
  source: Observable,
}

impl SwitchOnNextOp {
  pub(crate) fn observable(source: Observable) -> Observable { Observable::new(Self { source }) }
}

impl CoreObservable for SwitchOnNextOp {
  fn actual_subscribe(&self, observer: BoxedObserver) -> Subscription {
    let subscription = Subscription::default();
    let state = MutRc::own(SwitchState {
      downstream: Downstream::new(observer, subscription.clone()),
      group: subscription.clone(),
      inner: None,
      inner_id: 0,
      inner_active: false,
      outer_completed: false,
    });
    subscription.add(self.source.actual_subscribe(Box::new(OuterObserver { state })));
    subscription
  }
}

struct SwitchState {
  downstream: Downstream,
  group: Subscription,
  inner: Option<Subscription>,
  /// Identifies the current inner; notifications of older ones are dropped.
  inner_id: usize,
  inner_active: bool,
  outer_completed: bool,
}

struct OuterObserver {
  state: MutRc<SwitchState>,
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

    let inner_subscription = Subscription::default();
    let (previous, id, group) = {
      let mut state = self.state.rc_deref_mut();
      if state.downstream.is_closed() {
        return;
      }
      state.inner_id += 1;
      state.inner_active = true;
      let previous = state.inner.replace(inner_subscription.clone());
      (previous, state.inner_id, state.group.clone())
    };
    if let Some(previous) = previous {
      tracing::trace!(inner = id, "switch_on_next: switching to a new inner observable");
      previous.unsubscribe();
    }
    group.add(inner_subscription.clone());
    let observer = InnerObserver { state: self.state.clone(), id };
    inner_subscription.add(inner.actual_subscribe(Box::new(observer)));
  }

  fn error(self, err: RxError) {
    let finish = self.state.rc_deref_mut().downstream.finish();
    finish.error(err);
  }

  fn complete(self) {
    let mut state = self.state.rc_deref_mut();
    state.outer_completed = true;
    if !state.inner_active {
      let finish = state.downstream.finish();
      drop(state);
      finish.complete();
    }
  }

  fn is_closed(&self) -> bool { self.state.rc_deref().downstream.is_closed() }
}

struct InnerObserver {
  state: MutRc<SwitchState>,
  id: usize,
}

impl Observer for InnerObserver {
  fn next(&mut self, value: Value) {
    let mut state = self.state.rc_deref_mut();
    if state.inner_id == self.id {
      state.downstream.next(value);
    }
  }

  fn error(self, err: RxError) {
    let mut state = self.state.rc_deref_mut();
    if state.inner_id == self.id {
      let finish = state.downstream.finish();
      drop(state);
      finish.error(err);
    }
  }

  fn complete(self) {
    let mut state = self.state.rc_deref_mut();
    if state.inner_id != self.id {
      return;
    }
    state.inner_active = false;
    if state.outer_completed {
      let finish = state.downstream.finish();
      drop(state);
      finish.complete();
    }
  }

  fn is_closed(&self) -> bool {
    let state = self.state.rc_deref();
    state.inner_id != self.id || state.downstream.is_closed()
  }
}
