/// A zero-based rank into the sorted order of an [`OrderedMap`](crate::OrderedMap).
///
/// Indexing by `Rank` panics when the rank is out of bounds; use
/// [`select`](crate::OrderedMap::select) or
/// [`get_by_rank`](crate::OrderedMap::get_by_rank) for a fallible lookup.
///
/// # Examples
///
/// ```
/// use llrb_ost::{OrderedMap, Rank};
///
/// let mut map = OrderedMap::new();
/// map.put("b", 20);
/// map.put("a", 10);
///
/// assert_eq!(map[Rank(0)], 10);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
