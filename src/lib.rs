//! # rxdyn: dynamically typed Reactive Extensions
//!
//! Push-based [Reactive Extensions](http://reactivex.io/) where every stream
//! carries [`Value`]s, a type-erased container. Operator chains are not
//! generic over their payload, so observables of different payload types
//! compose freely, combine into each other and travel inside values.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use rxdyn::prelude::*;
//!
//! let out = Rc::new(RefCell::new(vec![]));
//! let c_out = out.clone();
//! Observable::range(1, 10, 1)
//!   .filter(|v: &i32| v % 2 == 0)
//!   .map(|v: i32| v * 2)
//!   .subscribe(move |v: i32| c_out.borrow_mut().push(v));
//! assert_eq!(*out.borrow(), vec![4, 8, 12, 16, 20]);
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Value`] | Immutable, shared, type-erased payload |
//! | [`Observable`] | Shared description of how to produce a sequence |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`Subscription`] | Handle to cancel an active subscription |
//! | [`Subject`] | Fed by hand (or through `observer()`); multicasts |
//! | [`DisposeBag`] | Cancels many subscriptions when dropped |
//!
//! Everything is single-threaded. Asynchrony comes from the caller through a
//! [`Scheduler`](scheduler::Scheduler).
//!
//! ## Feature Flags
//!
//! - **`futures-scheduler`** (default): a [`Scheduler`](scheduler::Scheduler)
//!   implementation for `futures::executor::LocalSpawner`.
//!
//! [`Value`]: value::Value
//! [`Observable`]: observable::Observable
//! [`Observer`]: observer::Observer
//! [`Subscription`]: subscription::Subscription
//! [`Subject`]: subject::Subject
//! [`DisposeBag`]: subscription::DisposeBag

pub mod config;
pub mod error;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod rc;
pub mod scheduler;
pub mod subject;
pub(crate) mod subscriber;
pub mod subscription;
pub mod value;

#[cfg(test)]
mod test_util;

pub use prelude::*;
