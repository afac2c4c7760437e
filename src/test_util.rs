use std::{
  cell::{Cell, RefCell},
  rc::Rc,
};

use crate::prelude::*;

/// Everything a subscription observed.
pub(crate) struct Recorded {
  values: Rc<RefCell<Vec<Value>>>,
  error: Rc<RefCell<Option<RxError>>>,
  completed: Rc<Cell<bool>>,
  pub(crate) subscription: Subscription,
}

pub(crate) fn record(source: impl ObservableExt) -> Recorded {
  let values = Rc::new(RefCell::new(vec![]));
  let error = Rc::new(RefCell::new(None));
  let completed = Rc::new(Cell::new(false));
  let (c_values, c_error, c_completed) = (values.clone(), error.clone(), completed.clone());
  let subscription = source.subscribe_all(
    move |v: Value| c_values.borrow_mut().push(v),
    move |e| *c_error.borrow_mut() = Some(e),
    move || c_completed.set(true),
  );
  Recorded { values, error, completed, subscription }
}

impl Recorded {
  pub(crate) fn values<T: ValueType>(&self) -> Vec<T> {
    self.values.borrow().iter().map(|v| v.unwrap::<T>().unwrap()).collect()
  }

  pub(crate) fn is_completed(&self) -> bool { self.completed.get() }

  pub(crate) fn error(&self) -> Option<RxError> { self.error.borrow().clone() }
}
