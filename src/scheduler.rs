//! Where deferred work runs.
//!
//! Nothing in this crate spawns threads or owns an event loop. Operators that
//! defer work (`observe_on`, `subscribe_on`) hand a task to a [`Scheduler`]
//! supplied by the caller.

use std::rc::Rc;

/// A Scheduler is an object to order tasks and schedule their execution.
pub trait Scheduler {
  fn schedule(&self, task: Box<dyn FnOnce()>);
}

/// Runs every task inline, before `schedule` returns.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
  #[inline]
  fn schedule(&self, task: Box<dyn FnOnce()>) { task() }
}

impl<S: Scheduler + ?Sized> Scheduler for Rc<S> {
  #[inline]
  fn schedule(&self, task: Box<dyn FnOnce()>) { (**self).schedule(task) }
}

impl<S: Scheduler + ?Sized> Scheduler for &S {
  #[inline]
  fn schedule(&self, task: Box<dyn FnOnce()>) { (**self).schedule(task) }
}

#[cfg(feature = "futures-scheduler")]
mod futures_scheduler {
  use futures::{executor::LocalSpawner, task::LocalSpawnExt};

  use super::Scheduler;

  /// Tasks run when the owning `LocalPool` is driven.
  impl Scheduler for LocalSpawner {
    fn schedule(&self, task: Box<dyn FnOnce()>) {
      if let Err(err) = self.spawn_local(async move { task() }) {
        tracing::warn!(%err, "local pool rejected a task; it is dropped");
      }
    }
  }
}
