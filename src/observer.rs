//! Observer trait and implementations
//!
//! The Observer trait defines the consumer of values in the reactive pattern.
//! Every observer receives type-erased [`Value`]s and terminates with either
//! an [`RxError`] or completion.

use crate::{
  error::RxError,
  rc::MutRc,
  subscription::Subscription,
  value::{Value, ValueType},
};

// ============================================================================
// Observer Trait
// ============================================================================

/// The consumer side of a stream.
pub trait Observer {
  /// Receive the next value from the observable
  fn next(&mut self, value: Value);

  /// Handle an error from the observable
  ///
  /// This consumes the observer, as no more values can be emitted after an
  /// error
  fn error(self, err: RxError);

  /// Handle completion of the observable
  ///
  /// This consumes the observer, as no more values can be emitted after
  /// completion
  fn complete(self);

  /// Returns `true` if the observer will not accept more values.
  ///
  /// Synchronous producers check this between emissions so a downstream
  /// `take` or an `unsubscribe` stops them early.
  fn is_closed(&self) -> bool;
}

// ============================================================================
// DynObserver Trait - Object-safe Observer
// ============================================================================

/// Object-safe mirror of [`Observer`], so observers can be boxed.
pub trait DynObserver {
  fn box_next(&mut self, value: Value);
  fn box_error(self: Box<Self>, err: RxError);
  fn box_complete(self: Box<Self>);
  fn box_is_closed(&self) -> bool;
}

impl<T: Observer> DynObserver for T {
  fn box_next(&mut self, value: Value) { self.next(value); }
  fn box_error(self: Box<Self>, err: RxError) { (*self).error(err); }
  fn box_complete(self: Box<Self>) { (*self).complete(); }
  fn box_is_closed(&self) -> bool { self.is_closed() }
}

pub type BoxedObserver = Box<dyn DynObserver>;

impl Observer for BoxedObserver {
  #[inline]
  fn next(&mut self, value: Value) { (**self).box_next(value) }

  #[inline]
  fn error(self, err: RxError) { self.box_error(err) }

  #[inline]
  fn complete(self) { self.box_complete() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).box_is_closed() }
}

// ============================================================================
// Observer implementations for wrappers
// ============================================================================

/// `None` is a closed observer that ignores everything.
impl<O: Observer> Observer for Option<O> {
  fn next(&mut self, value: Value) {
    if let Some(observer) = self {
      observer.next(value);
    }
  }

  fn error(self, err: RxError) {
    if let Some(observer) = self {
      observer.error(err);
    }
  }

  fn complete(self) {
    if let Some(observer) = self {
      observer.complete();
    }
  }

  fn is_closed(&self) -> bool { self.as_ref().map_or(true, O::is_closed) }
}

/// A shared observer slot. Terminal notifications empty the slot, so every
/// other handle sees it closed afterwards.
impl<O: Observer> Observer for MutRc<Option<O>> {
  fn next(&mut self, value: Value) { self.rc_deref_mut().next(value) }

  fn error(self, err: RxError) {
    let observer = self.rc_deref_mut().take();
    observer.error(err);
  }

  fn complete(self) {
    let observer = self.rc_deref_mut().take();
    observer.complete();
  }

  fn is_closed(&self) -> bool { self.rc_deref().is_closed() }
}

/// A subscription that drops the observer in `slot` when unsubscribed,
/// unless that observer is being notified right now.
pub(crate) fn releasing_subscription(slot: &MutRc<Option<BoxedObserver>>) -> Subscription {
  let slot = slot.downgrade();
  Subscription::new(move || {
    if let Some(slot) = slot.upgrade() {
      let released = slot.try_rc_deref_mut().ok().and_then(|mut observer| observer.take());
      drop(released);
    }
  })
}

// ============================================================================
// Emitter
// ============================================================================

/// The producer handle passed to [`Observable::create`].
///
/// `Emitter` is cheap to clone and can be moved into callbacks or scheduled
/// tasks. Once the stream terminates or the consumer unsubscribes, every
/// method becomes a no-op.
///
/// [`Observable::create`]: crate::observable::Observable::create
#[derive(Clone)]
pub struct Emitter {
  observer: MutRc<Option<BoxedObserver>>,
  subscription: Subscription,
}

impl Emitter {
  pub(crate) fn new(observer: BoxedObserver) -> Self {
    let observer = MutRc::own(Some(observer));
    let subscription = releasing_subscription(&observer);
    Self { observer, subscription }
  }

  pub(crate) fn subscription(&self) -> Subscription { self.subscription.clone() }

  pub fn next(&self, value: impl ValueType) {
    if !self.subscription.is_closed() {
      self.observer.clone().next(value.into_value());
    }
  }

  pub fn error(&self, err: RxError) {
    if !self.subscription.is_closed() {
      self.observer.clone().error(err);
      self.subscription.unsubscribe();
    }
  }

  pub fn complete(&self) {
    if !self.subscription.is_closed() {
      self.observer.clone().complete();
      self.subscription.unsubscribe();
    }
  }

  pub fn is_closed(&self) -> bool { self.subscription.is_closed() || self.observer.is_closed() }
}
