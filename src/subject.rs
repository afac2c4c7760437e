//! Subjects: observers that are also observables.
//!
//! A [`Subject`] multicasts every notification it receives to the observers
//! subscribed at that moment. [`BehaviorSubject`] additionally remembers the
//! latest value and [`ReplaySubject`] a bounded history.

use std::{cell::RefMut, fmt};

use crate::{
  error::RxError,
  observable::CoreObservable,
  observer::{BoxedObserver, Observer},
  rc::MutRc,
  subscription::Subscription,
  value::{Value, ValueType},
};

mod behavior_subject;
mod replay_subject;
mod subscribers;

pub use behavior_subject::BehaviorSubject;
pub use replay_subject::ReplaySubject;
use subscribers::{Slot, Subscribers};

#[derive(Clone)]
enum Terminal {
  Completed,
  Errored(RxError),
}

#[derive(Default)]
struct SubjectState {
  observers: Subscribers,
  terminal: Option<Terminal>,
}

/// A multicasting observable that is fed by hand (a PublishSubject).
///
/// Observers subscribed while a value is being dispatched receive values from
/// the next emission on; observers unsubscribed during dispatch receive
/// nothing further. After `error` or `complete` every new subscriber gets
/// the terminal notification right away.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use rxdyn::prelude::*;
///
/// let subject = Subject::default();
/// let seen = Rc::new(RefCell::new(vec![]));
/// let c_seen = seen.clone();
/// subject.clone().subscribe(move |v: i32| c_seen.borrow_mut().push(v));
/// subject.next(1);
/// subject.next(2);
/// assert_eq!(*seen.borrow(), vec![1, 2]);
/// ```
#[derive(Clone, Default)]
pub struct Subject(MutRc<SubjectState>);

impl Subject {
  pub fn new() -> Self { Self::default() }

  pub fn next(&self, value: impl ValueType) { self.emit(value.into_value()) }

  pub fn error(&self, err: RxError) { self.terminate(Terminal::Errored(err)) }

  pub fn complete(&self) { self.terminate(Terminal::Completed) }

  /// Number of subscribed observers that still accept values.
  pub fn observer_count(&self) -> usize { self.0.rc_deref().observers.open_count() }

  pub fn is_terminated(&self) -> bool { self.0.rc_deref().terminal.is_some() }

  pub(crate) fn emit(&self, value: Value) {
    let snapshot = {
      let state = self.0.rc_deref();
      if state.terminal.is_some() {
        return;
      }
      state.observers.snapshot()
    };
    for (id, slot) in snapshot {
      if !self.0.rc_deref().observers.contains(id) {
        continue;
      }
      lock(&slot).next(value.clone());
    }
    let closed = self.0.rc_deref_mut().observers.take_closed();
    drop(closed);
  }

  fn terminate(&self, terminal: Terminal) {
    let observers = {
      let mut state = self.0.rc_deref_mut();
      if state.terminal.is_some() {
        return;
      }
      state.terminal = Some(terminal.clone());
      state.observers.take_all()
    };
    match terminal {
      Terminal::Completed => {
        tracing::debug!(observers = observers.len(), "subject completed");
        for slot in observers {
          let observer = lock(&slot).take();
          observer.complete();
        }
      }
      Terminal::Errored(err) => {
        tracing::debug!(observers = observers.len(), %err, "subject errored");
        for slot in observers {
          let observer = lock(&slot).take();
          observer.error(err.clone());
        }
      }
    }
  }
}

/// Borrows a subscribed observer for a notification. A slot that is already
/// borrowed means an observer fed this subject from inside its own callback.
fn lock(slot: &Slot) -> RefMut<'_, Option<BoxedObserver>> {
  slot.try_rc_deref_mut().unwrap_or_else(|_| {
    panic!(
      "re-entrant Subject emissions are not supported (next/error/complete). Use an explicit \
       async boundary (e.g. observe_on) if you need feedback loops."
    )
  })
}

impl CoreObservable for Subject {
  fn actual_subscribe(&self, observer: BoxedObserver) -> Subscription {
    let terminal = self.0.rc_deref().terminal.clone();
    match terminal {
      Some(Terminal::Completed) => {
        observer.complete();
        return Subscription::closed();
      }
      Some(Terminal::Errored(err)) => {
        observer.error(err);
        return Subscription::closed();
      }
      None => {}
    }

    let slot = MutRc::own(Some(observer));
    let id = self.0.rc_deref_mut().observers.add(slot.clone());
    let state = self.0.downgrade();
    Subscription::new(move || {
      if let Some(state) = state.upgrade() {
        let removed = state.rc_deref_mut().observers.remove(id);
        drop(removed);
      }
      let released = slot.try_rc_deref_mut().ok().and_then(|mut observer| observer.take());
      drop(released);
    })
  }
}

/// An [`Observer`] that feeds a subject, returned by `observer()` on each
/// subject type.
///
/// Subjects keep their `next`/`error`/`complete` on `&self`, so the terminal
/// calls can be repeated on any handle; this wrapper adapts them to the
/// consuming [`Observer`] protocol.
#[derive(Clone, Debug)]
pub struct SubjectObserver<S>(S);

macro_rules! impl_subject_observer {
  ($($ty:ty),*) => {
    $(
      impl $ty {
        /// An observer that forwards every notification into this subject.
        pub fn observer(&self) -> SubjectObserver<$ty> { SubjectObserver(self.clone()) }
      }

      impl Observer for SubjectObserver<$ty> {
        fn next(&mut self, value: Value) { self.0.next(value) }

        fn error(self, err: RxError) { self.0.error(err) }

        fn complete(self) { self.0.complete() }

        fn is_closed(&self) -> bool { self.0.is_terminated() }
      }
    )*
  };
}

impl_subject_observer!(Subject, BehaviorSubject, ReplaySubject);

impl fmt::Debug for Subject {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let state = self.0.rc_deref();
    f.debug_struct("Subject")
      .field("observers", &state.observers.open_count())
      .field("terminated", &state.terminal.is_some())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::{prelude::*, test_util::record};

  #[test]
  fn base_data_flow() {
    let subject = Subject::default();
    let first = record(subject.clone());
    subject.next(1);
    let second = record(subject.clone());
    subject.next(2);
    subject.complete();
    assert_eq!(first.values::<i32>(), vec![1, 2]);
    assert_eq!(second.values::<i32>(), vec![2]);
    assert!(first.is_completed() && second.is_completed());
  }

  #[test]
  fn nothing_after_terminal() {
    let subject = Subject::default();
    let r = record(subject.clone());
    subject.complete();
    subject.next(1);
    subject.error(RxError::msg("late"));
    assert!(r.values::<i32>().is_empty());
    assert!(r.is_completed());
    assert!(r.error().is_none());
  }

  #[test]
  fn terminal_replayed_to_late_subscribers() {
    let subject = Subject::default();
    subject.error(RxError::msg("gone"));
    let r = record(subject.clone());
    assert!(matches!(r.error(), Some(RxError::Message(m)) if m == "gone"));
    assert_eq!(subject.observer_count(), 0);
  }

  #[test]
  fn subscribed_during_dispatch_waits_for_next_emission() {
    let subject = Subject::default();
    let late = Rc::new(RefCell::new(vec![]));
    let (c_subject, c_late) = (subject.clone(), late.clone());
    let subscribed = Rc::new(RefCell::new(false));
    subject.clone().subscribe(move |_: i32| {
      if !subscribed.replace(true) {
        let c_late = c_late.clone();
        c_subject.clone().subscribe(move |v: i32| c_late.borrow_mut().push(v));
      }
    });
    subject.next(1);
    assert!(late.borrow().is_empty());
    subject.next(2);
    assert_eq!(*late.borrow(), vec![2]);
  }

  #[test]
  fn unsubscribed_during_dispatch_receives_nothing() {
    let subject = Subject::default();
    let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
    let c_victim = victim.clone();
    subject.clone().subscribe(move |_: i32| {
      if let Some(subscription) = c_victim.borrow_mut().take() {
        subscription.unsubscribe();
      }
    });
    let r = record(subject.clone());
    *victim.borrow_mut() = Some(r.subscription.clone());
    subject.next(1);
    assert!(r.values::<i32>().is_empty());
    assert_eq!(subject.observer_count(), 1);
  }

  #[test]
  fn closed_observers_are_pruned() {
    let subject = Subject::default();
    let r = record(subject.clone().take(1));
    subject.next(1);
    assert!(r.is_completed());
    assert_eq!(subject.observer_count(), 0);
  }

  #[test]
  fn subject_as_observer() {
    let subject = Subject::default();
    let r = record(subject.clone());
    Observable::from_iter(1..4).subscribe_observer(subject.observer());
    assert_eq!(r.values::<i32>(), vec![1, 2, 3]);
    assert!(r.is_completed());
    assert!(subject.is_terminated());
  }

  #[test]
  fn owned_handle_allows_repeated_terminal_calls() {
    let subject = Subject::default();
    let r = record(subject.clone());
    subject.complete();
    subject.error(RxError::msg("ignored"));
    subject.complete();
    assert!(subject.is_terminated());
    assert!(r.is_completed());
    assert!(r.error().is_none());
  }

  #[test]
  fn wrapped_subjects_accept_observer_input() {
    let behavior = BehaviorSubject::new(0);
    let replay = ReplaySubject::new(4);
    let from_behavior = record(behavior.clone());
    Observable::from_iter(1..3).subscribe_observer(behavior.observer());
    Observable::from_iter(1..3).subscribe_observer(replay.observer());
    assert_eq!(from_behavior.values::<i32>(), vec![0, 1, 2]);
    assert!(behavior.is_terminated() && replay.is_terminated());
    let late = record(replay.clone());
    assert_eq!(late.values::<i32>(), vec![1, 2]);
    assert!(late.is_completed());
  }

  #[test]
  #[should_panic(expected = "re-entrant Subject emissions are not supported")]
  fn reentrant_terminal_reports_feedback_loop() {
    let subject = Subject::default();
    let c_subject = subject.clone();
    subject.clone().subscribe(move |v: i32| {
      if v == 2 {
        c_subject.complete();
      }
    });
    subject.next(1);
    subject.next(2);
  }
}
