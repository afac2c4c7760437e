//! Operators.
//!
//! Every operator is a method of [`ObservableExt`] and lives in its own
//! module as one `CoreObservable` struct plus the observer it subscribes
//! upstream with. Typed closures unwrap their inputs from [`Value`] and wrap
//! their results; a conversion failure ends the stream with
//! [`RxError::TypeMismatch`].

use std::rc::Rc;

use crate::{
  error::{Result, RxError},
  observable::Observable,
  observer::Observer,
  scheduler::Scheduler,
  subject::{BehaviorSubject, ReplaySubject, Subject},
  subscriber::{self, ErrorHandler, FnObserver},
  subscription::Subscription,
  value::{Value, ValueType},
};

/// Implements `error`, `complete` and `is_closed` of an operator observer by
/// forwarding to its `observer` field.
macro_rules! forward_terminal {
  () => {
    fn error(self, err: $crate::error::RxError) {
      $crate::observer::Observer::error(self.observer, err)
    }

    fn complete(self) { $crate::observer::Observer::complete(self.observer) }

    fn is_closed(&self) -> bool { $crate::observer::Observer::is_closed(&self.observer) }
  };
}

pub mod combine_latest;
pub mod concat;
pub mod distinct_until_changed;
pub mod element_at;
pub mod filter;
pub mod map;
pub mod merge;
pub mod merge_all;
pub mod observe_on;
pub mod reduce;
pub mod retry;
pub mod scan;
pub mod skip;
pub mod skip_until;
pub mod skip_while;
pub mod sources;
pub mod start_with;
pub mod subscribe_on;
pub mod switch_on_next;
pub mod take;
pub mod take_last;
pub mod take_until;
pub mod take_while;
pub mod with_latest_from;
pub mod zip;

pub use sources::{Combiner, IntoSources, MAX_ARITY};
use sources::Combine;

/// Type-erased one-argument function shared by every subscription of an
/// operator.
pub(crate) type ValueFn<R> = Rc<dyn Fn(Value) -> Result<R>>;

pub(crate) fn typed_fn<A, B>(f: impl Fn(A) -> Result<B> + 'static) -> ValueFn<Value>
where
  A: ValueType,
  B: ValueType,
{
  Rc::new(move |value: Value| -> Result<Value> { f(value.unwrap::<A>()?).map(B::into_value) })
}

pub(crate) fn typed_predicate<A: ValueType>(pred: impl Fn(&A) -> bool + 'static) -> ValueFn<bool> {
  Rc::new(move |value: Value| -> Result<bool> { Ok(pred(&value.unwrap::<A>()?)) })
}

/// Extension methods shared by every observable-like type.
///
/// Implemented for [`Observable`] and the subjects; all operators return a
/// plain [`Observable`].
pub trait ObservableExt: Sized {
  fn into_observable(self) -> Observable;

  // ==================== subscribe ====================

  /// Subscribes with a `next` callback only. Errors go to the process-wide
  /// [`ErrorPolicy`](crate::config::ErrorPolicy).
  fn subscribe<T: ValueType>(self, next: impl FnMut(T) + 'static) -> Subscription {
    let observer =
      FnObserver::new(subscriber::typed_next(next), ErrorHandler::default(), None);
    subscriber::subscribe(&self.into_observable(), observer)
  }

  fn subscribe_err<T: ValueType>(
    self,
    next: impl FnMut(T) + 'static,
    error: impl FnOnce(RxError) + 'static,
  ) -> Subscription {
    let error = ErrorHandler::Callback(Box::new(error));
    let observer = FnObserver::new(subscriber::typed_next(next), error, None);
    subscriber::subscribe(&self.into_observable(), observer)
  }

  fn subscribe_complete<T: ValueType>(
    self,
    next: impl FnMut(T) + 'static,
    complete: impl FnOnce() + 'static,
  ) -> Subscription {
    let observer = FnObserver::new(
      subscriber::typed_next(next),
      ErrorHandler::default(),
      Some(Box::new(complete)),
    );
    subscriber::subscribe(&self.into_observable(), observer)
  }

  fn subscribe_all<T: ValueType>(
    self,
    next: impl FnMut(T) + 'static,
    error: impl FnOnce(RxError) + 'static,
    complete: impl FnOnce() + 'static,
  ) -> Subscription {
    let error = ErrorHandler::Callback(Box::new(error));
    let observer = FnObserver::new(subscriber::typed_next(next), error, Some(Box::new(complete)));
    subscriber::subscribe(&self.into_observable(), observer)
  }

  /// Subscribes any [`Observer`], for example [`Subject::observer`].
  fn subscribe_observer(self, observer: impl Observer + 'static) -> Subscription {
    subscriber::subscribe(&self.into_observable(), observer)
  }

  // ==================== transform ====================

  /// Emits `f(value)` for every value.
  fn map<A, B>(self, f: impl Fn(A) -> B + 'static) -> Observable
  where
    A: ValueType,
    B: ValueType,
  {
    map::MapOp::observable(self.into_observable(), typed_fn(move |a| Ok(f(a))))
  }

  /// Like [`map`](Self::map), but an `Err` ends the stream with that error.
  fn try_map<A, B>(self, f: impl Fn(A) -> Result<B> + 'static) -> Observable
  where
    A: ValueType,
    B: ValueType,
  {
    map::MapOp::observable(self.into_observable(), typed_fn(f))
  }

  fn filter<A: ValueType>(self, pred: impl Fn(&A) -> bool + 'static) -> Observable {
    filter::FilterOp::observable(self.into_observable(), typed_predicate(pred))
  }

  /// Emits every intermediate accumulation.
  fn scan<Acc, A>(self, seed: Acc, f: impl Fn(Acc, A) -> Acc + 'static) -> Observable
  where
    Acc: ValueType,
    A: ValueType,
  {
    scan::ScanOp::observable(self.into_observable(), seed.into_value(), accumulator(f))
  }

  /// Emits the final accumulation, or `seed` for an empty source, once the
  /// source completes.
  fn reduce<Acc, A>(self, seed: Acc, f: impl Fn(Acc, A) -> Acc + 'static) -> Observable
  where
    Acc: ValueType,
    A: ValueType,
  {
    reduce::ReduceOp::observable(self.into_observable(), seed.into_value(), accumulator(f))
  }

  // ==================== filter ====================

  fn skip(self, count: usize) -> Observable {
    skip::SkipOp::observable(self.into_observable(), count)
  }

  /// Drops values while `pred` holds, then relays everything.
  fn skip_while<A: ValueType>(self, pred: impl Fn(&A) -> bool + 'static) -> Observable {
    skip_while::SkipWhileOp::observable(self.into_observable(), typed_predicate(pred))
  }

  /// Relays values only after `trigger` emitted once.
  fn skip_until(self, trigger: impl ObservableExt) -> Observable {
    skip_until::SkipUntilOp::observable(self.into_observable(), trigger.into_observable())
  }

  fn take(self, count: usize) -> Observable {
    take::TakeOp::observable(self.into_observable(), count)
  }

  /// Emits the last `count` values when the source completes.
  fn take_last(self, count: usize) -> Observable {
    take_last::TakeLastOp::observable(self.into_observable(), count)
  }

  /// Relays values while `pred` holds and completes on the first value that
  /// fails it. That value is not emitted.
  fn take_while<A: ValueType>(self, pred: impl Fn(&A) -> bool + 'static) -> Observable {
    take_while::TakeWhileOp::observable(self.into_observable(), typed_predicate(pred))
  }

  /// Relays values until `trigger` emits, then completes.
  fn take_until(self, trigger: impl ObservableExt) -> Observable {
    take_until::TakeUntilOp::observable(self.into_observable(), trigger.into_observable())
  }

  /// Emits the value at `index` and completes. Completes without emitting if
  /// the source is shorter.
  fn element_at(self, index: usize) -> Observable {
    element_at::ElementAtOp::observable(self.into_observable(), index)
  }

  /// Suppresses values equal to the previous emission, compared with
  /// [`Value::loose_eq`] so that `3` and `"3"` count as a repeat.
  fn distinct_until_changed(self) -> Observable {
    distinct_until_changed::DistinctUntilChangedOp::observable(
      self.into_observable(),
      Rc::new(|prev: &Value, next: &Value| -> Result<bool> { Ok(prev.loose_eq(next)) }),
    )
  }

  /// Like [`distinct_until_changed`](Self::distinct_until_changed) with a
  /// caller-supplied equivalence.
  fn distinct_until_changed_by<A: ValueType>(
    self,
    eq: impl Fn(&A, &A) -> bool + 'static,
  ) -> Observable {
    distinct_until_changed::DistinctUntilChangedOp::observable(
      self.into_observable(),
      Rc::new(move |prev: &Value, next: &Value| -> Result<bool> {
        Ok(eq(&prev.unwrap::<A>()?, &next.unwrap::<A>()?))
      }),
    )
  }

  // ==================== shape ====================

  /// Emits `values` before subscribing to the source.
  fn start_with<I>(self, values: I) -> Observable
  where
    I: IntoIterator,
    I::Item: ValueType,
  {
    let values = values.into_iter().map(ValueType::into_value).collect();
    start_with::StartWithOp::observable(self.into_observable(), values)
  }

  /// Resubscribes after an error, at most `count` times.
  fn retry(self, count: usize) -> Observable {
    retry::RetryOp::observable(self.into_observable(), count)
  }

  // ==================== combine ====================

  /// Emits the ordered list of the latest value of every source, once all
  /// of them emitted. The list unwraps as a tuple.
  fn combine_latest(self, others: impl IntoSources) -> Observable {
    combine_latest::CombineLatestOp::observable(self.into_observable(), others, Combine::list())
  }

  fn combine_latest_with<Args, C>(self, others: impl IntoSources, combiner: C) -> Observable
  where
    C: Combiner<Args> + 'static,
  {
    let combine = Combine::typed(combiner);
    combine_latest::CombineLatestOp::observable(self.into_observable(), others, combine)
  }

  /// Emits when the receiver emits and every other source has a value.
  fn with_latest_from(self, others: impl IntoSources) -> Observable {
    with_latest_from::WithLatestFromOp::observable(self.into_observable(), others, Combine::list())
  }

  fn with_latest_from_with<Args, C>(self, others: impl IntoSources, combiner: C) -> Observable
  where
    C: Combiner<Args> + 'static,
  {
    let combine = Combine::typed(combiner);
    with_latest_from::WithLatestFromOp::observable(self.into_observable(), others, combine)
  }

  /// Relays every value of every source in arrival order.
  fn merge(self, others: impl IntoSources) -> Observable {
    merge::MergeOp::observable(self.into_observable(), others)
  }

  /// Pairs values by position: the n-th emission combines the n-th value of
  /// every source.
  fn zip(self, others: impl IntoSources) -> Observable {
    zip::ZipOp::observable(self.into_observable(), others, Combine::list())
  }

  fn zip_with<Args, C>(self, others: impl IntoSources, combiner: C) -> Observable
  where
    C: Combiner<Args> + 'static,
  {
    let combine = Combine::typed(combiner);
    zip::ZipOp::observable(self.into_observable(), others, combine)
  }

  /// Subscribes to each source after the previous one completed.
  fn concat(self, others: impl IntoSources) -> Observable {
    concat::ConcatOp::observable(self.into_observable(), others)
  }

  // ==================== higher order ====================

  /// Flattens an observable of observables by always following the most
  /// recent inner observable.
  fn switch_on_next(self) -> Observable {
    switch_on_next::SwitchOnNextOp::observable(self.into_observable())
  }

  /// Flattens an observable of observables, subscribing to every inner one.
  fn merge_all(self) -> Observable { merge_all::MergeAllOp::observable(self.into_observable()) }

  fn flat_map<A, R>(self, f: impl Fn(A) -> R + 'static) -> Observable
  where
    A: ValueType,
    R: ObservableExt,
  {
    self.map(move |a: A| f(a).into_observable()).merge_all()
  }

  // ==================== scheduling ====================

  /// Delivers every notification through `scheduler`.
  fn observe_on(self, scheduler: impl Scheduler + 'static) -> Observable {
    observe_on::ObserveOnOp::observable(self.into_observable(), Rc::new(scheduler))
  }

  /// Subscribes to the source from a task on `scheduler`.
  fn subscribe_on(self, scheduler: impl Scheduler + 'static) -> Observable {
    subscribe_on::SubscribeOnOp::observable(self.into_observable(), Rc::new(scheduler))
  }
}

pub(crate) type AccumulatorFn = Rc<dyn Fn(&Value, Value) -> Result<Value>>;

fn accumulator<Acc, A>(f: impl Fn(Acc, A) -> Acc + 'static) -> AccumulatorFn
where
  Acc: ValueType,
  A: ValueType,
{
  Rc::new(move |acc: &Value, value: Value| -> Result<Value> {
    Ok(f(acc.unwrap::<Acc>()?, value.unwrap::<A>()?).into_value())
  })
}

impl ObservableExt for Observable {
  #[inline]
  fn into_observable(self) -> Observable { self }
}

macro_rules! impl_observable_ext_for_subject {
  ($($ty:ty),*) => {
    $(
      impl ObservableExt for $ty {
        fn into_observable(self) -> Observable { Observable::new(self) }
      }

      impl ObservableExt for &$ty {
        fn into_observable(self) -> Observable { Observable::new(self.clone()) }
      }
    )*
  };
}

impl_observable_ext_for_subject!(Subject, BehaviorSubject, ReplaySubject);
