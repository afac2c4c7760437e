use std::rc::Rc;

use crate::{
  error::RxError,
  observable::{CoreObservable, Observable},
  observer::{self, BoxedObserver, Observer},
  rc::MutRc,
  scheduler::Scheduler,
  subscription::Subscription,
  value::Value,
};

/// Re-emits every notification from a task on the scheduler.
pub struct ObserveOnOp {
  source: Observable,
  scheduler: Rc<dyn Scheduler>,
}

impl ObserveOnOp {
  pub(crate) fn observable(source: Observable, scheduler: Rc<dyn Scheduler>) -> Observable {
    Observable::new(Self { source, scheduler })
  }
}

impl CoreObservable for ObserveOnOp {
  fn actual_subscribe(&self, observer: BoxedObserver) -> Subscription {
    let slot = MutRc::own(Some(observer));
    let subscription = observer::releasing_subscription(&slot);
    let observer = ObserveOnObserver {
      observer: slot,
      scheduler: self.scheduler.clone(),
      subscription: subscription.clone(),
    };
    subscription.add(self.source.actual_subscribe(Box::new(observer)));
    subscription
  }
}

struct ObserveOnObserver {
  observer: MutRc<Option<BoxedObserver>>,
  scheduler: Rc<dyn Scheduler>,
  subscription: Subscription,
}

impl ObserveOnObserver {
  fn schedule_task(&self, task: impl FnOnce(MutRc<Option<BoxedObserver>>) + 'static) {
    if self.subscription.is_closed() {
      return;
    }
    let observer = self.observer.clone();
    let subscription = self.subscription.clone();
    self.scheduler.schedule(Box::new(move || {
      if !subscription.is_closed() {
        task(observer);
      }
    }));
  }
}

impl Observer for ObserveOnObserver {
  fn next(&mut self, value: Value) { self.schedule_task(move |mut observer| observer.next(value)) }

  fn error(self, err: RxError) { self.schedule_task(move |observer| observer.error(err)) }

  fn complete(self) { self.schedule_task(Observer::complete) }

  fn is_closed(&self) -> bool { self.subscription.is_closed() }
}
