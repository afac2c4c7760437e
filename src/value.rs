//! The type-erased unit of emission.
//!
//! Every observable emits [`Value`]s, so operator chains are not generic over
//! their payload type. A `Value` holds one reference-counted payload of any
//! registered type. Registration means implementing [`ValueType`], usually
//! through [`impl_value_type!`](crate::impl_value_type).
//!
//! ```rust
//! use rxdyn::prelude::*;
//!
//! let v = Value::wrap(42);
//! assert_eq!(v.unwrap::<i32>().ok(), Some(42));
//! assert!(v.unwrap::<String>().is_err());
//! assert_ne!(v, Value::from("42"));
//! ```

use std::{
  any::{type_name, Any},
  fmt::{Debug, Formatter},
  rc::Rc,
};

use crate::error::{Result, RxError};

// ============================================================================
// Payload - object-safe erasure
// ============================================================================

/// Object-safe view of a stored payload.
///
/// Implemented for every `Any + PartialEq + Debug` type, which is what lets
/// [`Value`] compare and print payloads without knowing their type.
pub trait Payload: Any {
  fn as_any(&self) -> &dyn Any;

  /// `true` only when `other` has the same concrete type and compares equal.
  fn payload_eq(&self, other: &dyn Payload) -> bool;

  fn payload_fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result;

  fn payload_type_name(&self) -> &'static str;
}

impl<T: Any + PartialEq + Debug> Payload for T {
  #[inline]
  fn as_any(&self) -> &dyn Any { self }

  fn payload_eq(&self, other: &dyn Payload) -> bool {
    other.as_any().downcast_ref::<T>().is_some_and(|other| self == other)
  }

  fn payload_fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { Debug::fmt(self, f) }

  #[inline]
  fn payload_type_name(&self) -> &'static str { type_name::<T>() }
}

// ============================================================================
// Value
// ============================================================================

/// A cheaply clonable, immutable container for one payload.
///
/// Two values are equal only when they hold the same concrete type and the
/// payloads compare equal; `Value::wrap(3)` never equals `Value::from("3")`.
/// [`Value::loose_eq`] relaxes this for numbers.
#[derive(Clone)]
pub struct Value(Rc<dyn Payload>);

impl Value {
  /// Wraps any registered type.
  #[inline]
  pub fn wrap<T: ValueType>(value: T) -> Self { value.into_value() }

  /// Converts back into `T`, failing with [`RxError::TypeMismatch`] when the
  /// stored type does not match.
  #[inline]
  pub fn unwrap<T: ValueType>(&self) -> Result<T> { T::from_value(self) }

  /// Stores `payload` as is. This is the primitive [`ValueType`]
  /// implementations are built on.
  pub fn from_payload<P: Payload>(payload: P) -> Self { Self(Rc::new(payload)) }

  /// The empty payload, used for notifications that carry no data.
  pub fn unit() -> Self { Self::from_payload(()) }

  pub fn downcast_ref<P: Payload>(&self) -> Option<&P> { self.0.as_any().downcast_ref::<P>() }

  pub fn is<P: Payload>(&self) -> bool { self.0.as_any().is::<P>() }

  /// Name of the stored payload type, for diagnostics.
  pub fn type_name(&self) -> &'static str { self.0.payload_type_name() }

  /// `true` when both values share the same allocation.
  pub fn ptr_eq(&self, other: &Value) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
  }

  /// Equality that looks through numeric representations.
  ///
  /// Besides strict equality, numbers of different primitive types compare
  /// by value (`3u8` equals `3.0f64`), and a number equals a `String` that
  /// parses to the same number (`3` equals `"3"` and `" 3.0 "`). Every other
  /// pair of different types is unequal.
  pub fn loose_eq(&self, other: &Value) -> bool {
    if self == other {
      return true;
    }
    if let (Some(a), Some(b)) = (self.as_integer(), other.as_integer()) {
      return a == b;
    }
    match (self.as_number(), other.as_number()) {
      (Some(a), Some(b)) => a == b,
      (Some(number), None) => other.parses_to(number),
      (None, Some(number)) => self.parses_to(number),
      (None, None) => false,
    }
  }

  fn as_integer(&self) -> Option<i128> {
    macro_rules! integer {
      ($($ty:ty),*) => {
        $(
          if let Some(v) = self.downcast_ref::<$ty>() {
            return i128::try_from(*v).ok();
          }
        )*
      };
    }
    integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
    None
  }

  fn as_number(&self) -> Option<f64> {
    if let Some(v) = self.downcast_ref::<f64>() {
      return Some(*v);
    }
    if let Some(v) = self.downcast_ref::<f32>() {
      return Some(f64::from(*v));
    }
    if let Some(v) = self.downcast_ref::<u128>() {
      return Some(*v as f64);
    }
    self.as_integer().map(|v| v as f64)
  }

  fn parses_to(&self, number: f64) -> bool {
    self
      .downcast_ref::<String>()
      .and_then(|s| s.trim().parse::<f64>().ok())
      .is_some_and(|parsed| parsed == number)
  }
}

impl PartialEq for Value {
  fn eq(&self, other: &Self) -> bool { self.ptr_eq(other) || self.0.payload_eq(&*other.0) }
}

impl Debug for Value {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { self.0.payload_fmt(f) }
}

impl Default for Value {
  fn default() -> Self { Self::unit() }
}

// ============================================================================
// ValueType - the conversion registry
// ============================================================================

/// Two-way conversion between a Rust type and [`Value`].
pub trait ValueType: Sized + 'static {
  fn into_value(self) -> Value;

  fn from_value(value: &Value) -> Result<Self>;
}

/// Registers types as [`ValueType`]s that are stored directly as payloads.
///
/// The types must be `Clone + PartialEq + Debug + 'static`. A `From<T> for
/// Value` conversion is generated alongside.
///
/// ```rust
/// use rxdyn::{impl_value_type, prelude::*};
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Point(i32, i32);
/// impl_value_type!(Point);
///
/// let v = Value::from(Point(1, 2));
/// assert_eq!(v.unwrap::<Point>().ok(), Some(Point(1, 2)));
/// ```
#[macro_export]
macro_rules! impl_value_type {
  ($($t:ty),* $(,)?) => {
    $(
      impl $crate::value::ValueType for $t {
        #[inline]
        fn into_value(self) -> $crate::value::Value { $crate::value::Value::from_payload(self) }

        fn from_value(value: &$crate::value::Value) -> $crate::error::Result<Self> {
          value.downcast_ref::<$t>().cloned().ok_or_else(|| {
            $crate::error::RxError::TypeMismatch {
              expected: ::std::any::type_name::<$t>(),
              actual: value.type_name(),
            }
          })
        }
      }

      impl ::std::convert::From<$t> for $crate::value::Value {
        #[inline]
        fn from(value: $t) -> Self { $crate::value::ValueType::into_value(value) }
      }
    )*
  };
}

impl_value_type!(
  (),
  bool,
  char,
  i8,
  i16,
  i32,
  i64,
  i128,
  isize,
  u8,
  u16,
  u32,
  u64,
  u128,
  usize,
  f32,
  f64,
  String
);

impl From<&str> for Value {
  fn from(value: &str) -> Self { Value::from_payload(value.to_owned()) }
}

impl ValueType for Value {
  #[inline]
  fn into_value(self) -> Value { self }

  #[inline]
  fn from_value(value: &Value) -> Result<Self> { Ok(value.clone()) }
}

/// Lists are stored as `Vec<Value>` so that a list of any element type can be
/// inspected without knowing that type.
impl<T: ValueType> ValueType for Vec<T> {
  fn into_value(self) -> Value {
    Value::from_payload(self.into_iter().map(T::into_value).collect::<Vec<_>>())
  }

  fn from_value(value: &Value) -> Result<Self> {
    let items = value
      .downcast_ref::<Vec<Value>>()
      .ok_or_else(|| RxError::type_mismatch::<Self>(value.type_name()))?;
    items.iter().map(T::from_value).collect()
  }
}

macro_rules! impl_value_type_for_tuple {
  ($len:literal; $($name:ident),+) => {
    impl<$($name: ValueType),+> ValueType for ($($name,)+) {
      #[allow(non_snake_case)]
      fn into_value(self) -> Value {
        let ($($name,)+) = self;
        Value::from_payload(vec![$($name.into_value()),+])
      }

      fn from_value(value: &Value) -> Result<Self> {
        let mismatch = || RxError::type_mismatch::<Self>(value.type_name());
        let items = value.downcast_ref::<Vec<Value>>().ok_or_else(mismatch)?;
        if items.len() != $len {
          return Err(mismatch());
        }
        let mut items = items.iter();
        Ok(($($name::from_value(items.next().ok_or_else(mismatch)?)?,)+))
      }
    }
  };
}

impl_value_type_for_tuple!(1; A);
impl_value_type_for_tuple!(2; A, B);
impl_value_type_for_tuple!(3; A, B, C);
impl_value_type_for_tuple!(4; A, B, C, D);
impl_value_type_for_tuple!(5; A, B, C, D, E);
impl_value_type_for_tuple!(6; A, B, C, D, E, F);
impl_value_type_for_tuple!(7; A, B, C, D, E, F, G);
impl_value_type_for_tuple!(8; A, B, C, D, E, F, G, H);

// ============================================================================
// Reference-counted resources
// ============================================================================

/// Payload for `Rc<T>`: compares by pointer identity, so any shared resource
/// (including closures behind `Rc<dyn Fn ..>`) can travel through a stream.
struct SharedPayload<T: ?Sized>(Rc<T>);

impl<T: ?Sized> PartialEq for SharedPayload<T> {
  fn eq(&self, other: &Self) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
  }
}

impl<T: ?Sized> Debug for SharedPayload<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "Rc<{}>({:p})", type_name::<T>(), Rc::as_ptr(&self.0))
  }
}

impl<T: ?Sized + 'static> ValueType for Rc<T> {
  fn into_value(self) -> Value { Value::from_payload(SharedPayload(self)) }

  fn from_value(value: &Value) -> Result<Self> {
    value
      .downcast_ref::<SharedPayload<T>>()
      .map(|shared| shared.0.clone())
      .ok_or_else(|| RxError::type_mismatch::<Self>(value.type_name()))
  }
}
