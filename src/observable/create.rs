use crate::{
  observable::CoreObservable,
  observer::{BoxedObserver, Emitter},
  subscription::Subscription,
};

/// What a [`Create`] callback may hand back: nothing, or a subscription
/// whose teardown runs when the stream ends.
pub trait IntoTeardown {
  fn into_teardown(self) -> Option<Subscription>;
}

impl IntoTeardown for () {
  fn into_teardown(self) -> Option<Subscription> { None }
}

impl IntoTeardown for Subscription {
  fn into_teardown(self) -> Option<Subscription> { Some(self) }
}

/// Observable created from a function.
///
/// This struct is created by [`Observable::create`].
///
/// [`Observable::create`]: crate::observable::Observable::create
pub struct Create<F> {
  on_subscribe: F,
}

impl<F> Create<F> {
  pub fn new(on_subscribe: F) -> Self { Self { on_subscribe } }
}

impl<F, R> CoreObservable for Create<F>
where
  F: Fn(Emitter) -> R,
  R: IntoTeardown,
{
  fn actual_subscribe(&self, observer: BoxedObserver) -> Subscription {
    let emitter = Emitter::new(observer);
    let subscription = emitter.subscription();
    if let Some(teardown) = (self.on_subscribe)(emitter).into_teardown() {
      subscription.add(teardown);
    }
    subscription
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::{prelude::*, test_util::record};

  #[test]
  fn next_and_complete() {
    let r = record(Observable::create(|emitter| {
      emitter.next(1);
      emitter.next(2);
      emitter.complete();
      emitter.next(3);
    }));
    assert_eq!(r.values::<i32>(), vec![1, 2]);
    assert!(r.is_completed());
  }

  #[test]
  fn error_ends_the_stream() {
    let r = record(Observable::create(|emitter| {
      emitter.error(RxError::msg("oops"));
      emitter.complete();
    }));
    assert!(!r.is_completed());
    assert_eq!(r.error().map(|e| e.to_string()), Some("oops".to_owned()));
  }

  #[test]
  fn teardown_runs_on_unsubscribe() {
    let unsubscribed = Rc::new(RefCell::new(false));
    let c_unsubscribed = unsubscribed.clone();
    let subscription = Observable::create(move |emitter| {
      emitter.next(1);
      let flag = c_unsubscribed.clone();
      Subscription::new(move || *flag.borrow_mut() = true)
    })
    .subscribe(|_: i32| {});

    assert!(!*unsubscribed.borrow());
    subscription.unsubscribe();
    assert!(*unsubscribed.borrow());
  }

  #[test]
  fn teardown_runs_on_complete() {
    let finished = Rc::new(RefCell::new(0));
    let c_finished = finished.clone();
    Observable::create(move |emitter| {
      let emitter2 = emitter.clone();
      let flag = c_finished.clone();
      let teardown = Subscription::new(move || *flag.borrow_mut() += 1);
      emitter2.complete();
      teardown
    })
    .subscribe(|_: i32| {});
    assert_eq!(*finished.borrow(), 1);
  }

  #[test]
  fn emitter_outlives_subscribe_call() {
    let slot: Rc<RefCell<Option<Emitter>>> = Rc::default();
    let c_slot = slot.clone();
    let r = record(Observable::create(move |emitter| {
      *c_slot.borrow_mut() = Some(emitter);
    }));
    let emitter = slot.borrow_mut().take().unwrap();
    emitter.next(String::from("later"));
    assert_eq!(r.values::<String>(), vec!["later"]);
    r.subscription.unsubscribe();
    assert!(emitter.is_closed());
  }
}
