use crate::{
  observer::{BoxedObserver, Observer},
  rc::MutRc,
  subscription::DynamicSubscriptions,
};

/// One subscribed observer. The slot is emptied by a terminal notification
/// or by unsubscribing.
pub(crate) type Slot = MutRc<Option<BoxedObserver>>;

/// Observers of a subject keyed by subscription id.
///
/// The subject never holds a borrow of this container while an observer
/// runs: dispatch works on a [`snapshot`](Self::snapshot), and entries are
/// removed and dropped by the caller after the borrow is released.
#[derive(Default)]
pub(crate) struct Subscribers {
  inner: DynamicSubscriptions<Slot>,
}

impl Subscribers {
  #[inline]
  pub(crate) fn add(&mut self, slot: Slot) -> usize { self.inner.add(slot) }

  #[inline]
  pub(crate) fn remove(&mut self, id: usize) -> Option<Slot> { self.inner.remove(id) }

  #[inline]
  pub(crate) fn contains(&self, id: usize) -> bool { self.inner.contains(id) }

  /// Observers present right now, in subscription order.
  pub(crate) fn snapshot(&self) -> Vec<(usize, Slot)> {
    self.inner.iter().map(|(id, slot)| (id, slot.clone())).collect()
  }

  /// Number of observers still accepting values. A slot busy with a
  /// notification counts as open.
  pub(crate) fn open_count(&self) -> usize {
    self.inner.iter().filter(|(_, slot)| !is_closed(slot)).count()
  }

  /// Removes closed observers and hands them back to be dropped outside the
  /// borrow.
  pub(crate) fn take_closed(&mut self) -> Vec<Slot> {
    let closed: Vec<usize> =
      self.inner.iter().filter(|(_, slot)| is_closed(slot)).map(|(id, _)| id).collect();
    closed.into_iter().filter_map(|id| self.inner.remove(id)).collect()
  }

  /// Empties the container for a terminal broadcast.
  pub(crate) fn take_all(&mut self) -> Vec<Slot> { self.inner.drain().collect() }
}

fn is_closed(slot: &Slot) -> bool {
  slot.try_rc_deref().map_or(false, |observer| observer.is_closed())
}
