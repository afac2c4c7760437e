//! Cancellation handles.
//!
//! A [`Subscription`] is a shared, idempotent cancel state. It owns teardown
//! actions and child subscriptions; unsubscribing runs each of them exactly
//! once. Every operator returns one composite `Subscription` that covers all
//! upstream work it started.

use std::{
  cell::RefCell,
  fmt::{Debug, Formatter},
  rc::Rc,
};

use smallvec::SmallVec;

mod dynamic;
pub use dynamic::DynamicSubscriptions;

/// Anything that can be cancelled.
pub trait SubscriptionLike {
  /// Cancels the work behind this handle. Calling it again has no effect.
  fn unsubscribe(&self);

  fn is_closed(&self) -> bool;
}

enum Teardown {
  Action(Box<dyn FnOnce()>),
  Child(Box<dyn SubscriptionLike>),
}

impl Teardown {
  fn run(self) {
    match self {
      Teardown::Action(action) => action(),
      Teardown::Child(child) => child.unsubscribe(),
    }
  }

  fn is_finished(&self) -> bool { matches!(self, Teardown::Child(child) if child.is_closed()) }
}

#[derive(Default)]
struct Inner {
  closed: bool,
  teardown: SmallVec<[Teardown; 1]>,
}

/// Cloneable handle to a shared cancel state.
#[derive(Clone, Default)]
pub struct Subscription(Rc<RefCell<Inner>>);

impl Subscription {
  /// An open subscription that runs `action` when cancelled.
  pub fn new(action: impl FnOnce() + 'static) -> Self {
    let subscription = Self::default();
    subscription.add_action(action);
    subscription
  }

  /// A subscription that is already closed, for work that finished
  /// synchronously.
  pub fn closed() -> Self {
    let subscription = Self::default();
    subscription.0.borrow_mut().closed = true;
    subscription
  }

  /// Ties `child` to this subscription. If this one is already closed,
  /// `child` is cancelled immediately.
  pub fn add(&self, child: impl SubscriptionLike + 'static) {
    if let Some(same) = (&child as &dyn std::any::Any).downcast_ref::<Self>() {
      if self.ptr_eq(same) {
        return;
      }
    }
    self.push(Teardown::Child(Box::new(child)));
  }

  /// Runs `action` on cancel, or right away if already closed.
  pub fn add_action(&self, action: impl FnOnce() + 'static) {
    self.push(Teardown::Action(Box::new(action)));
  }

  fn push(&self, teardown: Teardown) {
    let mut inner = self.0.borrow_mut();
    if inner.closed {
      drop(inner);
      teardown.run();
    } else {
      inner.teardown.retain(|t| !t.is_finished());
      inner.teardown.push(teardown);
    }
  }

  pub fn unsubscribe(&self) {
    let teardown = {
      let mut inner = self.0.borrow_mut();
      if inner.closed {
        return;
      }
      inner.closed = true;
      std::mem::take(&mut inner.teardown)
    };
    for t in teardown {
      t.run();
    }
  }

  #[inline]
  pub fn is_closed(&self) -> bool { self.0.borrow().closed }

  #[inline]
  pub fn is_subscribed(&self) -> bool { !self.is_closed() }

  /// Hands this subscription to `bag`, which cancels it when disposed.
  pub fn disposed_by(self, bag: &DisposeBag) { bag.add(self) }

  /// Activates "RAII" behavior for this subscription. That means
  /// `unsubscribe()` will be called automatically as soon as the returned
  /// value goes out of scope.
  ///
  /// **Attention:** If you don't assign the return value to a variable,
  /// `unsubscribe()` is called immediately, which is probably not what you
  /// want!
  pub fn unsubscribe_when_dropped(self) -> SubscriptionGuard { SubscriptionGuard(self) }

  pub fn ptr_eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.0, &other.0) }

  #[cfg(test)]
  pub(crate) fn teardown_size(&self) -> usize { self.0.borrow().teardown.len() }
}

impl SubscriptionLike for Subscription {
  #[inline]
  fn unsubscribe(&self) { Subscription::unsubscribe(self) }

  #[inline]
  fn is_closed(&self) -> bool { Subscription::is_closed(self) }
}

impl Debug for Subscription {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let inner = self.0.borrow();
    f.debug_struct("Subscription")
      .field("closed", &inner.closed)
      .field("teardown_count", &inner.teardown.len())
      .finish()
  }
}

/// An RAII implementation of a "scoped subscribed" of a subscription.
/// When this structure is dropped (falls out of scope), the subscription will
/// be unsubscribed.
///
/// If you want to drop it immediately, wrap it in its own scope
#[derive(Debug)]
#[must_use]
pub struct SubscriptionGuard(Subscription);

impl SubscriptionGuard {
  pub fn new(subscription: Subscription) -> Self { Self(subscription) }

  pub fn subscription(&self) -> &Subscription { &self.0 }
}

impl Drop for SubscriptionGuard {
  #[inline]
  fn drop(&mut self) { self.0.unsubscribe() }
}

// ============================================================================
// DisposeBag
// ============================================================================

/// Owns subscriptions and cancels all of them, each exactly once, when
/// disposed or dropped.
///
/// ```rust
/// use rxdyn::prelude::*;
///
/// let subject = Subject::default();
/// {
///   let bag = DisposeBag::default();
///   subject.clone().subscribe(|_: i32| {}).disposed_by(&bag);
///   assert_eq!(subject.observer_count(), 1);
/// }
/// assert_eq!(subject.observer_count(), 0);
/// ```
#[derive(Default)]
pub struct DisposeBag {
  subscriptions: RefCell<DynamicSubscriptions<Subscription>>,
}

impl DisposeBag {
  pub fn add(&self, subscription: Subscription) {
    let mut subscriptions = self.subscriptions.borrow_mut();
    subscriptions.retain(|s| !s.is_closed());
    subscriptions.add(subscription);
  }

  /// Cancels everything added so far. The bag stays usable.
  pub fn dispose(&self) {
    let taken: Vec<_> = self.subscriptions.borrow_mut().drain().collect();
    for subscription in taken {
      subscription.unsubscribe();
    }
  }

  pub fn len(&self) -> usize { self.subscriptions.borrow().len() }

  pub fn is_empty(&self) -> bool { self.subscriptions.borrow().is_empty() }
}

impl Drop for DisposeBag {
  fn drop(&mut self) { self.subscriptions.get_mut().unsubscribe_all() }
}

impl Debug for DisposeBag {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("DisposeBag").field("len", &self.len()).finish()
  }
}
