use smallvec::SmallVec;

use super::SubscriptionLike;

/// Items keyed by a monotonically increasing id.
///
/// Backs both the observer table of subjects and [`DisposeBag`]. Ids are
/// never reused, so a stale id can only miss, never hit another entry.
///
/// ```rust
/// use rxdyn::subscription::DynamicSubscriptions;
///
/// let mut subs: DynamicSubscriptions<&str> = DynamicSubscriptions::default();
/// let a = subs.add("a");
/// let b = subs.add("b");
/// assert_eq!(subs.remove(a), Some("a"));
/// assert!(subs.remove(a).is_none());
/// assert!(subs.contains(b));
/// assert_eq!(subs.len(), 1);
/// ```
///
/// [`DisposeBag`]: super::DisposeBag
pub struct DynamicSubscriptions<U> {
  next_id: usize,
  items: SmallVec<[(usize, U); 2]>,
}

impl<U> Default for DynamicSubscriptions<U> {
  fn default() -> Self { Self { next_id: 0, items: SmallVec::new() } }
}

impl<U> DynamicSubscriptions<U> {
  /// Add an item and return its id.
  #[inline]
  pub fn add(&mut self, item: U) -> usize {
    let id = self.next_id;
    self.next_id += 1;
    self.items.push((id, item));
    id
  }

  pub fn remove(&mut self, id: usize) -> Option<U> {
    self
      .items
      .iter()
      .position(|(i, _)| *i == id)
      .map(|pos| self.items.remove(pos).1)
  }

  #[inline]
  pub fn contains(&self, id: usize) -> bool { self.items.iter().any(|(i, _)| *i == id) }

  #[inline]
  pub fn len(&self) -> usize { self.items.len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.items.is_empty() }

  /// Takes every item out, leaving the container empty.
  #[inline]
  pub fn drain(&mut self) -> impl Iterator<Item = U> + '_ {
    self.items.drain(..).map(|(_, item)| item)
  }

  /// Iterates `(id, item)` pairs in insertion order.
  #[inline]
  pub fn iter(&self) -> impl Iterator<Item = (usize, &U)> {
    self.items.iter().map(|(id, item)| (*id, item))
  }

  pub fn retain(&mut self, mut keep: impl FnMut(&U) -> bool) {
    self.items.retain(|(_, item)| keep(item));
  }
}

impl<U: SubscriptionLike> DynamicSubscriptions<U> {
  /// Unsubscribe all items and clear the container.
  pub fn unsubscribe_all(&mut self) {
    for item in self.drain() {
      item.unsubscribe();
    }
  }

  #[inline]
  pub fn all_closed(&self) -> bool { self.items.iter().all(|(_, item)| item.is_closed()) }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::subscription::Subscription;

  #[test]
  fn ids_are_not_reused() {
    let mut subs = DynamicSubscriptions::default();
    let first = subs.add(1);
    subs.remove(first);
    let second = subs.add(2);
    assert_ne!(first, second);
    assert_eq!(subs.iter().collect::<Vec<_>>(), vec![(second, &2)]);
  }

  #[test]
  fn unsubscribe_all_drains() {
    let mut subs = DynamicSubscriptions::default();
    let a = Subscription::default();
    let b = Subscription::default();
    subs.add(a.clone());
    subs.add(b.clone());
    assert!(!subs.all_closed());
    subs.unsubscribe_all();
    assert!(subs.is_empty());
    assert!(a.is_closed() && b.is_closed());
  }
}
