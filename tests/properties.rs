use std::{cell::RefCell, rc::Rc};

use proptest::{collection::vec, prelude::*};
use rxdyn::prelude::*;

fn collect<T: ValueType + Clone>(source: impl ObservableExt) -> Vec<T> {
  let out = Rc::new(RefCell::new(vec![]));
  let c_out = out.clone();
  source.subscribe(move |v: T| c_out.borrow_mut().push(v));
  let values = out.borrow().clone();
  values
}

proptest! {
  #[test]
  fn distinct_until_changed_never_repeats(items in vec(0..4i32, 0..40)) {
    let out = collect::<i32>(Observable::from_iter(items.clone()).distinct_until_changed());
    prop_assert!(out.windows(2).all(|w| w[0] != w[1]));
    let mut expected = items;
    expected.dedup();
    prop_assert_eq!(out, expected);
  }

  #[test]
  fn merge_relays_every_value(lens in vec(0..10usize, 1..MAX_ARITY)) {
    let sources: Vec<Observable> =
      lens.iter().map(|len| Observable::from_iter(0..*len)).collect();
    let out = collect::<usize>(Observable::empty().merge(sources));
    prop_assert_eq!(out.len(), lens.iter().sum::<usize>());
  }

  #[test]
  fn zip_stops_at_shortest(a in vec(any::<i32>(), 0..20), b in vec(any::<i32>(), 0..20)) {
    let zipped = Observable::from_iter(a.clone()).zip(Observable::from_iter(b.clone()));
    let out = collect::<(i32, i32)>(zipped);
    let expected: Vec<(i32, i32)> = a.into_iter().zip(b).collect();
    prop_assert_eq!(out, expected);
  }

  #[test]
  fn take_and_skip_partition(items in vec(any::<i16>(), 0..30), n in 0..40usize) {
    let source = Observable::from_iter(items.clone());
    let mut out = collect::<i16>(source.clone().take(n));
    out.extend(collect::<i16>(source.skip(n)));
    prop_assert_eq!(out, items);
  }

  #[test]
  fn range_covers_both_ends(start in -50..50i32, len in 0..50i32, step in 1..10i32) {
    let out = collect::<i32>(Observable::range(start, start + len, step));
    prop_assert_eq!(out.first().copied(), Some(start));
    prop_assert_eq!(out.last().copied(), Some(start + len));
    prop_assert!(out.windows(2).all(|w| w[0] < w[1]));
  }
}
