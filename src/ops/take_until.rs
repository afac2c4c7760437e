use crate::{
  error::RxError,
  observable::{CoreObservable, Observable},
  observer::{BoxedObserver, Observer},
  ops::sources::Downstream,
  rc::MutRc,
  subscription::Subscription,
  value::Value,
};

pub struct TakeUntilOp {
  source: Observable,
  notifier: Observable,
}

impl TakeUntilOp {
  pub(crate) fn observable(source: Observable, notifier: Observable) -> Observable {
    Observable::new(Self { source, notifier })
  }
}

impl CoreObservable for TakeUntilOp {
  fn actual_subscribe(&self, observer: BoxedObserver) -> Subscription {
    let subscription = Subscription::default();
    let downstream = MutRc::own(Downstream::new(observer, subscription.clone()));
    // A notifier that fires during subscription ends the stream before the
    // source is touched.
    let notifier = NotifierObserver { downstream: downstream.clone() };
    subscription.add(self.notifier.actual_subscribe(Box::new(notifier)));
    if !subscription.is_closed() {
      let observer = TakeUntilObserver { downstream };
      subscription.add(self.source.actual_subscribe(Box::new(observer)));
    }
    subscription
  }
}

struct TakeUntilObserver {
  downstream: MutRc<Downstream>,
}

impl Observer for TakeUntilObserver {
  fn next(&mut self, value: Value) { self.downstream.rc_deref_mut().next(value) }

  fn error(self, err: RxError) {
    let finish = self.downstream.rc_deref_mut().finish();
    finish.error(err);
  }

  fn complete(self) {
    let finish = self.downstream.rc_deref_mut().finish();
    finish.complete();
  }

  fn is_closed(&self) -> bool { self.downstream.rc_deref().is_closed() }
}

struct NotifierObserver {
  downstream: MutRc<Downstream>,
}

impl Observer for NotifierObserver {
  fn next(&mut self, _: Value) {
    let finish = self.downstream.rc_deref_mut().finish();
    finish.complete();
  }

  fn error(self, err: RxError) {
    let finish = self.downstream.rc_deref_mut().finish();
    finish.error(err);
  }

  fn complete(self) {}

  fn is_closed(&self) -> bool { self.downstream.rc_deref().is_closed() }
}

#[cfg(test)]
mod tests {
  use crate::{prelude::*, test_util::record};

  #[test]
  fn emits_until_notifier_emits() {
    let (notifier, source) = (Subject::default(), Subject::default());
    let r = record(source.clone().take_until(notifier.clone()));
    source.next(1);
    source.next(2);
    notifier.next(());
    source.next(3);
    assert_eq!(r.values::<i32>(), vec![1, 2]);
    assert!(r.is_completed());
    assert_eq!(source.observer_count() + notifier.observer_count(), 0);
  }

  #[test]
  fn source_complete() {
    let (notifier, source) = (Subject::default(), Subject::default());
    let r = record(source.clone().take_until(notifier.clone()));
    source.next(1);
    source.complete();
    assert!(r.is_completed());
    assert_eq!(notifier.observer_count(), 0);
  }

  #[test]
  fn notifier_complete_does_nothing() {
    let (notifier, source) = (Subject::default(), Subject::default());
    let r = record(source.clone().take_until(notifier.clone()));
    source.next(1);
    notifier.complete();
    source.next(2);
    assert_eq!(r.values::<i32>(), vec![1, 2]);
    assert!(!r.is_completed());
  }

  #[test]
  fn synchronous_notifier_skips_source() {
    let r = record(Observable::from_iter(0..10).take_until(Observable::just(())));
    assert!(r.values::<i32>().is_empty());
    assert!(r.is_completed());
  }
}
