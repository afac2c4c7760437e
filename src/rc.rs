use std::{
  cell::{BorrowError, BorrowMutError, Ref, RefCell, RefMut},
  rc::{Rc, Weak},
};

/// Shared mutable state for stateful operators.
///
/// Every observer an operator hands to its sources keeps a clone, so all of
/// them see the same counters, buffers and downstream observer.
#[derive(Default)]
pub struct MutRc<T>(Rc<RefCell<T>>);

impl<T> MutRc<T> {
  pub fn own(t: T) -> Self { Self(Rc::new(RefCell::new(t))) }

  #[inline]
  pub fn rc_deref(&self) -> Ref<'_, T> { self.0.borrow() }

  #[inline]
  pub fn rc_deref_mut(&self) -> RefMut<'_, T> { self.0.borrow_mut() }

  #[inline]
  pub fn try_rc_deref(&self) -> Result<Ref<'_, T>, BorrowError> { self.0.try_borrow() }

  /// Like [`rc_deref_mut`](Self::rc_deref_mut) but fails instead of
  /// panicking when the cell is already borrowed.
  #[inline]
  pub fn try_rc_deref_mut(&self) -> Result<RefMut<'_, T>, BorrowMutError> {
    self.0.try_borrow_mut()
  }

  pub fn downgrade(&self) -> WeakMutRc<T> { WeakMutRc(Rc::downgrade(&self.0)) }

  pub fn ptr_eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.0, &other.0) }
}

impl<T> Clone for MutRc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T: std::fmt::Debug> std::fmt::Debug for MutRc<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self.0.try_borrow() {
      Ok(inner) => f.debug_tuple("MutRc").field(&*inner).finish(),
      Err(_) => f.write_str("MutRc(<borrowed>)"),
    }
  }
}

/// Non-owning counterpart of [`MutRc`], used where a back reference would
/// otherwise form a cycle.
pub struct WeakMutRc<T>(Weak<RefCell<T>>);

impl<T> WeakMutRc<T> {
  pub fn upgrade(&self) -> Option<MutRc<T>> { self.0.upgrade().map(MutRc) }
}

impl<T> Clone for WeakMutRc<T> {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}
