//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

pub use crate::{
  error::{Result, RxError},
  observable::{CoreObservable, Observable},
  observer::{BoxedObserver, Emitter, Observer},
  ops::{ObservableExt, MAX_ARITY},
  scheduler::{ImmediateScheduler, Scheduler},
  subject::{BehaviorSubject, ReplaySubject, Subject, SubjectObserver},
  subscription::{DisposeBag, Subscription, SubscriptionGuard, SubscriptionLike},
  value::{Value, ValueType},
};
