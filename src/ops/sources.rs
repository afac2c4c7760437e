//! Inputs of the multi-source operators.
//!
//! [`IntoSources`] gathers the observables to combine with the receiver and
//! [`Combiner`] turns a typed closure of up to [`MAX_ARITY`] arguments into a
//! function over the latest values.

use std::rc::Rc;

use crate::{
  error::{Result, RxError},
  observable::Observable,
  observer::{BoxedObserver, Observer},
  ops::ObservableExt,
  subject::{BehaviorSubject, ReplaySubject, Subject},
  subscription::Subscription,
  value::{Value, ValueType},
};

/// The most sources `combine_latest`, `with_latest_from` and `zip` accept,
/// the receiver included.
pub const MAX_ARITY: usize = 8;

/// Everything that can be passed as "the other sources" of a multi-source
/// operator: one observable or subject, a tuple of up to seven, an array or
/// a `Vec`.
pub trait IntoSources {
  fn into_sources(self) -> Vec<Observable>;
}

macro_rules! impl_into_sources_for_single {
  ($($ty:ty),*) => {
    $(
      impl IntoSources for $ty {
        fn into_sources(self) -> Vec<Observable> { vec![self.into_observable()] }
      }

      impl IntoSources for &$ty {
        fn into_sources(self) -> Vec<Observable> { vec![self.clone().into_observable()] }
      }
    )*
  };
}

impl_into_sources_for_single!(Observable, Subject, BehaviorSubject, ReplaySubject);

impl<T: ObservableExt> IntoSources for Vec<T> {
  fn into_sources(self) -> Vec<Observable> {
    self.into_iter().map(ObservableExt::into_observable).collect()
  }
}

impl<T: ObservableExt, const N: usize> IntoSources for [T; N] {
  fn into_sources(self) -> Vec<Observable> {
    self.into_iter().map(ObservableExt::into_observable).collect()
  }
}

macro_rules! impl_into_sources_for_tuple {
  ($($name:ident),+) => {
    impl<$($name: ObservableExt),+> IntoSources for ($($name,)+) {
      #[allow(non_snake_case)]
      fn into_sources(self) -> Vec<Observable> {
        let ($($name,)+) = self;
        vec![$($name.into_observable()),+]
      }
    }
  };
}

impl_into_sources_for_tuple!(A);
impl_into_sources_for_tuple!(A, B);
impl_into_sources_for_tuple!(A, B, C);
impl_into_sources_for_tuple!(A, B, C, D);
impl_into_sources_for_tuple!(A, B, C, D, E);
impl_into_sources_for_tuple!(A, B, C, D, E, F);
impl_into_sources_for_tuple!(A, B, C, D, E, F, G);

/// Prepends the receiver to `others` and enforces [`MAX_ARITY`].
pub(crate) fn gather(first: Observable, others: impl IntoSources) -> Result<Vec<Observable>> {
  let mut sources = vec![first];
  sources.extend(others.into_sources());
  if sources.len() > MAX_ARITY {
    tracing::debug!(max = MAX_ARITY, actual = sources.len(), "too many sources to combine");
    return Err(RxError::ArityExceeded { max: MAX_ARITY, actual: sources.len() });
  }
  Ok(sources)
}

/// A typed closure that combines the latest values.
///
/// Implemented for every `Fn(A, B, ..) -> R` of arity 1 to 8 whose arguments
/// and result are [`ValueType`]s. A combiner may take fewer arguments than
/// there are sources; it then receives the leading values.
pub trait Combiner<Args> {
  const ARITY: usize;

  fn combine(&self, values: &[Value]) -> Result<Value>;
}

macro_rules! impl_combiner {
  ($len:literal; $($name:ident),+) => {
    impl<Func, Ret, $($name),+> Combiner<($($name,)+)> for Func
    where
      Func: Fn($($name),+) -> Ret,
      Ret: ValueType,
      $($name: ValueType),+
    {
      const ARITY: usize = $len;

      fn combine(&self, values: &[Value]) -> Result<Value> {
        let actual = values.len();
        let mismatch = || RxError::ArityMismatch { expected: $len, actual };
        let mut values = values.iter();
        Ok(
          (self)($(
            $name::from_value(values.next().ok_or_else(mismatch)?)?
          ),+)
          .into_value(),
        )
      }
    }
  };
}

impl_combiner!(1; A);
impl_combiner!(2; A, B);
impl_combiner!(3; A, B, C);
impl_combiner!(4; A, B, C, D);
impl_combiner!(5; A, B, C, D, E);
impl_combiner!(6; A, B, C, D, E, F);
impl_combiner!(7; A, B, C, D, E, F, G);
impl_combiner!(8; A, B, C, D, E, F, G, H);

/// A combination function together with the number of values it reads.
#[derive(Clone)]
pub(crate) struct Combine {
  arity: usize,
  func: Rc<dyn Fn(&[Value]) -> Result<Value>>,
}

impl Combine {
  /// Emission used when no combiner is given: the values as one list, which
  /// unwraps as a tuple.
  pub(crate) fn list() -> Self {
    let func = |values: &[Value]| -> Result<Value> { Ok(Value::from_payload(values.to_vec())) };
    Self { arity: 0, func: Rc::new(func) }
  }

  pub(crate) fn typed<Args, C>(combiner: C) -> Self
  where
    C: Combiner<Args> + 'static,
  {
    Self { arity: C::ARITY, func: Rc::new(move |values: &[Value]| combiner.combine(values)) }
  }

  /// Fails when the combiner reads more values than there are sources.
  pub(crate) fn check(&self, sources: usize) -> Result<()> {
    if self.arity > sources {
      tracing::debug!(
        expected = self.arity,
        actual = sources,
        "combiner takes more values than sources"
      );
      return Err(RxError::ArityMismatch { expected: self.arity, actual: sources });
    }
    Ok(())
  }

  #[inline]
  pub(crate) fn call(&self, values: &[Value]) -> Result<Value> { (self.func)(values) }
}

// ==================== fan-in plumbing ====================

/// Subscribes `observer(index)` to each source in order, stopping once
/// `subscription` closes.
pub(crate) fn subscribe_each<'a>(
  sources: impl IntoIterator<Item = (usize, &'a Observable)>,
  subscription: &Subscription,
  mut observer: impl FnMut(usize) -> BoxedObserver,
) {
  for (index, source) in sources {
    if subscription.is_closed() {
      break;
    }
    subscription.add(source.actual_subscribe(observer(index)));
  }
}

/// The downstream of a multi-source operator together with the subscription
/// that covers all of its sources.
pub(crate) struct Downstream {
  observer: Option<BoxedObserver>,
  subscription: Subscription,
}

impl Downstream {
  pub(crate) fn new(observer: BoxedObserver, subscription: Subscription) -> Self {
    Self { observer: Some(observer), subscription }
  }

  #[inline]
  pub(crate) fn next(&mut self, value: Value) { self.observer.next(value) }

  #[inline]
  pub(crate) fn is_closed(&self) -> bool { self.observer.is_closed() }

  /// Detaches the downstream so it can be terminated after the state borrow
  /// is released.
  pub(crate) fn finish(&mut self) -> Finish {
    Finish { observer: self.observer.take(), subscription: self.subscription.clone() }
  }
}

/// A detached downstream. Terminating it also cancels every source.
#[must_use]
pub(crate) struct Finish {
  observer: Option<BoxedObserver>,
  subscription: Subscription,
}

impl Finish {
  pub(crate) fn error(self, err: RxError) {
    self.subscription.unsubscribe();
    self.observer.error(err);
  }

  pub(crate) fn complete(self) {
    self.subscription.unsubscribe();
    self.observer.complete();
  }
}
