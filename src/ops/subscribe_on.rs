use std::rc::Rc;

use crate::{
  observable::{CoreObservable, Observable},
  observer::BoxedObserver,
  scheduler::Scheduler,
  subscription::Subscription,
};

pub struct SubscribeOnOp {
  source: Observable,
  scheduler: Rc<dyn Scheduler>,
}

impl SubscribeOnOp {
  pub(crate) fn observable(source: Observable, scheduler: Rc<dyn Scheduler>) -> Observable {
    Observable::new(Self { source, scheduler })
  }
}

impl CoreObservable for SubscribeOnOp {
  fn actual_subscribe(&self, observer: BoxedObserver) -> Subscription {
    let subscription = Subscription::default();
    let source = self.source.clone();
    let c_subscription = subscription.clone();
    self.scheduler.schedule(Box::new(move || {
      if !c_subscription.is_closed() {
        c_subscription.add(source.actual_subscribe(observer));
      }
    }));
    subscription
  }
}
