use std::fmt::Debug;

use crate::{
  error::RxError,
  observable::CoreObservable,
  observer::{BoxedObserver, Observer},
  subscription::Subscription,
  value::ValueType,
};

/// Numeric types [`Observable::range`](crate::observable::Observable::range)
/// can count with.
pub trait RangeItem: ValueType + Copy + PartialOrd + Default + Debug {
  /// `self + step`, or `None` when the sum is not representable.
  fn checked_step(self, step: Self) -> Option<Self>;
}

macro_rules! impl_range_item_int {
  ($($ty:ty),*) => {
    $(
      impl RangeItem for $ty {
        #[inline]
        fn checked_step(self, step: Self) -> Option<Self> { self.checked_add(step) }
      }
    )*
  };
}

macro_rules! impl_range_item_float {
  ($($ty:ty),*) => {
    $(
      impl RangeItem for $ty {
        #[inline]
        fn checked_step(self, step: Self) -> Option<Self> {
          let next = self + step;
          next.is_finite().then_some(next)
        }
      }
    )*
  };
}

impl_range_item_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_range_item_float!(f32, f64);

/// Counts from `start` to `end` inclusive. The last step is clamped to `end`.
#[derive(Clone)]
pub struct Range<T> {
  pub(crate) start: T,
  pub(crate) end: T,
  pub(crate) step: T,
}

impl<T: RangeItem> CoreObservable for Range<T> {
  fn actual_subscribe(&self, mut observer: BoxedObserver) -> Subscription {
    let Range { start, end, step } = *self;
    if step <= T::default() {
      let message = format!("range step must be positive, got {step:?}");
      observer.error(RxError::InvalidArgument(message));
      return Subscription::closed();
    }
    // An end below the start collapses the range to its start.
    let end = if end < start { start } else { end };

    let mut current = start;
    loop {
      if observer.is_closed() {
        return Subscription::closed();
      }
      observer.next(current.into_value());
      if current >= end {
        break;
      }
      // A step past `end`, or past the type's limit, lands on `end`.
      current = match current.checked_step(step) {
        Some(next) if next < end => next,
        _ => end,
      };
    }
    observer.complete();
    Subscription::closed()
  }
}
