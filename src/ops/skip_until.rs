use crate::{
  error::RxError,
  observable::{CoreObservable, Observable},
  observer::{BoxedObserver, Observer},
  ops::sources::Downstream,
  rc::MutRc,
  subscription::Subscription,
  value::Value,
};

pub struct SkipUntilOp {
  source: Observable,
  notifier: Observable,
}

impl SkipUntilOp {
  pub(crate) fn observable(source: Observable, notifier: Observable) -> Observable {
    Observable::new(Self { source, notifier })
  }
}

impl CoreObservable for SkipUntilOp {
  fn actual_subscribe(&self, observer: BoxedObserver) -> Subscription {
    let subscription = Subscription::default();
    let state = MutRc::own(SkipUntilState {
      downstream: Downstream::new(observer, subscription.clone()),
      open: false,
    });
    let notifier_subscription = Subscription::default();
    subscription.add(notifier_subscription.clone());
    let notifier =
      NotifierObserver { state: state.clone(), subscription: notifier_subscription.clone() };
    notifier_subscription.add(self.notifier.actual_subscribe(Box::new(notifier)));
    if !subscription.is_closed() {
      subscription.add(self.source.actual_subscribe(Box::new(SkipUntilObserver { state })));
    }
    subscription
  }
}

struct SkipUntilState {
  downstream: Downstream,
  open: bool,
}

struct SkipUntilObserver {
  state: MutRc<SkipUntilState>,
}

impl Observer for SkipUntilObserver {
  fn next(&mut self, value: Value) {
    let mut state = self.state.rc_deref_mut();
    if state.open {
      state.downstream.next(value);
    }
  }

  fn error(self, err: RxError) {
    let finish = self.state.rc_deref_mut().downstream.finish();
    finish.error(err);
  }

  fn complete(self) {
    let finish = self.state.rc_deref_mut().downstream.finish();
    finish.complete();
  }

  fn is_closed(&self) -> bool { self.state.rc_deref().downstream.is_closed() }
}

/// Opens the gate on the first notification and then unsubscribes itself.
struct NotifierObserver {
  state: MutRc<SkipUntilState>,
  subscription: Subscription,
}

impl Observer for NotifierObserver {
  fn next(&mut self, _: Value) {
    self.state.rc_deref_mut().open = true;
    self.subscription.unsubscribe();
  }

  fn error(self, err: RxError) {
    let finish = self.state.rc_deref_mut().downstream.finish();
    finish.error(err);
  }

  fn complete(self) {}

  fn is_closed(&self) -> bool {
    self.subscription.is_closed() || self.state.rc_deref().downstream.is_closed()
  }
}
