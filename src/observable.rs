//! The [`Observable`] handle and its factories.
//!
//! An observable is an immutable description of how to produce a sequence:
//! a shared [`CoreObservable`] that, given an observer, starts producing and
//! returns the [`Subscription`] that cancels the work.

use std::{
  fmt::{Debug, Formatter},
  rc::Rc,
};

use crate::{
  error::RxError,
  observer::{BoxedObserver, Emitter},
  subscription::Subscription,
  value::ValueType,
};

mod create;
mod from_iter;
mod range;
mod trivial;

pub use create::{Create, IntoTeardown};
pub use from_iter::{FromIter, Just};
pub use range::{Range, RangeItem};
pub use trivial::{Empty, Never, Throw};

/// The subscribe function behind an [`Observable`].
///
/// Operators and factories implement this; users usually only see
/// `Observable`.
pub trait CoreObservable {
  /// Starts producing into `observer`. The returned subscription cancels
  /// whatever is still running; it may already be closed when the work
  /// finished synchronously.
  fn actual_subscribe(&self, observer: BoxedObserver) -> Subscription;
}

/// Cheaply clonable handle sharing one subscribe function.
///
/// Two handles are equal when they share the same subscribe function.
#[derive(Clone)]
pub struct Observable(Rc<dyn CoreObservable>);

impl Observable {
  pub fn new(core: impl CoreObservable + 'static) -> Self { Self(Rc::new(core)) }

  #[inline]
  pub fn actual_subscribe(&self, observer: BoxedObserver) -> Subscription {
    self.0.actual_subscribe(observer)
  }

  // ==================== factories ====================

  /// Emits `value` once, then completes.
  pub fn just(value: impl ValueType) -> Self { Self::new(Just(value.into_value())) }

  /// Emits every item of `iter` in order, then completes.
  ///
  /// The items are collected when the observable is created, so every
  /// subscriber sees the same sequence.
  pub fn from_iter<I>(iter: I) -> Self
  where
    I: IntoIterator,
    I::Item: ValueType,
  {
    Self::new(FromIter(iter.into_iter().map(ValueType::into_value).collect()))
  }

  /// Emits `start`, `start + step`, ... up to and including `end`.
  ///
  /// When `step` does not divide the span, the last emission is clamped to
  /// `end`, so `range(4, 7, 2)` emits 4, 6 and 7. A `step` that is not
  /// positive makes every subscription fail with
  /// [`RxError::InvalidArgument`].
  pub fn range<T: RangeItem>(start: T, end: T, step: T) -> Self {
    Self::new(Range { start, end, step })
  }

  /// Calls `on_subscribe` with an [`Emitter`] for every subscription.
  ///
  /// `on_subscribe` may return a [`Subscription`] whose teardown runs when
  /// the subscriber cancels or the stream terminates.
  ///
  /// ```rust
  /// use std::{cell::RefCell, rc::Rc};
  ///
  /// use rxdyn::prelude::*;
  ///
  /// let o = Observable::create(|emitter| {
  ///   emitter.next(1);
  ///   emitter.next(String::from("two"));
  ///   emitter.complete();
  /// });
  /// let seen = Rc::new(RefCell::new(vec![]));
  /// let c_seen = seen.clone();
  /// o.subscribe(move |v: Value| c_seen.borrow_mut().push(v));
  /// assert_eq!(*seen.borrow(), vec![Value::wrap(1), Value::from("two")]);
  /// ```
  pub fn create<F, R>(on_subscribe: F) -> Self
  where
    F: Fn(Emitter) -> R + 'static,
    R: IntoTeardown,
  {
    Self::new(Create::new(on_subscribe))
  }

  /// Completes immediately.
  pub fn empty() -> Self { Self::new(Empty) }

  /// Never emits and never terminates.
  pub fn never() -> Self { Self::new(Never) }

  /// Errors immediately with `err`.
  pub fn throw(err: RxError) -> Self { Self::new(Throw(err)) }

  pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
  }
}

impl PartialEq for Observable {
  fn eq(&self, other: &Self) -> bool { self.ptr_eq(other) }
}

impl Debug for Observable {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "Observable({:p})", Rc::as_ptr(&self.0))
  }
}

crate::impl_value_type!(Observable);

#[cfg(test)]
mod tests {
  use super::*;
  use crate::value::Value;

  #[test]
  fn clones_are_equal() {
    let o = Observable::just(1);
    assert_eq!(o, o.clone());
    assert_ne!(o, Observable::just(1));
  }

  #[test]
  fn observable_travels_inside_value() {
    let o = Observable::empty();
    let v = Value::wrap(o.clone());
    assert_eq!(v.unwrap::<Observable>().ok(), Some(o));
    assert!(Value::wrap(3).unwrap::<Observable>().is_err());
  }
}
