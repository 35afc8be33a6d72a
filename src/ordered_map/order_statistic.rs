use core::borrow::Borrow;
use core::ops::{Index, IndexMut};

use super::{KeysInRange, OrderedMap};
use crate::Rank;
use crate::error::{Error, Result};

impl<K, V> OrderedMap<K, V> {
    /// Returns the key at position `rank` in sorted order. This is the
    /// inverse of [`rank`](OrderedMap::rank).
    ///
    /// # Errors
    ///
    /// Returns [`Error::RankOutOfBounds`] unless `rank < self.len()`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_ost::{Error, OrderedMap};
    ///
    /// let map = OrderedMap::from([("c", 3), ("a", 1), ("b", 2)]);
    /// assert_eq!(map.select(0), Ok(&"a"));
    /// assert_eq!(map.select(2), Ok(&"c"));
    /// assert_eq!(map.select(3), Err(Error::RankOutOfBounds { rank: 3, len: 3 }));
    /// ```
    pub fn select(&self, rank: usize) -> Result<&K> {
        self.get_by_rank(rank).map(|(key, _)| key).ok_or(Error::RankOutOfBounds {
            rank,
            len: self.len(),
        })
    }

    /// Returns the key-value pair at position `rank` in sorted order, or
    /// `None` if `rank` is out of bounds.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_ost::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.put("a", 10);
    /// map.put("c", 30);
    /// map.put("b", 20);
    ///
    /// assert_eq!(map.get_by_rank(1), Some((&"b", &20)));
    /// assert!(map.get_by_rank(3).is_none());
    /// ```
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<(&K, &V)> {
        self.raw.get_by_rank(rank)
    }

    /// Returns the key and a mutable reference to the value at position
    /// `rank` in sorted order.
    ///
    /// The key is returned as a shared reference because mutating it would
    /// violate the map's ordering invariants.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_ost::OrderedMap;
    ///
    /// let mut map = OrderedMap::from([(10, "a"), (5, "b")]);
    ///
    /// if let Some((key, value)) = map.get_by_rank_mut(0) {
    ///     assert_eq!(*key, 5);
    ///     *value = "updated";
    /// }
    ///
    /// assert_eq!(map.get(&5), Some(&"updated"));
    /// ```
    #[must_use]
    pub fn get_by_rank_mut(&mut self, rank: usize) -> Option<(&K, &mut V)> {
        self.raw.get_by_rank_mut(rank)
    }
}

impl<K: Ord, V> OrderedMap<K, V> {
    /// Returns the number of keys strictly less than `key`.
    ///
    /// `key` need not be present; the result is where it would land in
    /// sorted order.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_ost::OrderedMap;
    ///
    /// let map = OrderedMap::from([(10, ()), (20, ()), (30, ())]);
    /// assert_eq!(map.rank(&10), 0);
    /// assert_eq!(map.rank(&25), 2);
    /// assert_eq!(map.rank(&99), 3);
    /// ```
    pub fn rank<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.rank(key)
    }

    /// Returns the zero-based rank of `key` in sorted order, or `None` if the
    /// key is not present.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_ost::OrderedMap;
    ///
    /// let map = OrderedMap::from([(10, "a"), (20, "b")]);
    /// assert_eq!(map.rank_of(&20), Some(1));
    /// assert_eq!(map.rank_of(&15), None);
    /// ```
    pub fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.contains(key).then(|| self.raw.rank(key))
    }

    /// Returns the largest key less than or equal to `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if every key in the map is greater than
    /// `key`, including when the map is empty.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_ost::{Error, OrderedMap};
    ///
    /// let map = OrderedMap::from([(2, ()), (5, ()), (8, ())]);
    /// assert_eq!(map.floor(&5), Ok(&5));
    /// assert_eq!(map.floor(&6), Ok(&5));
    /// assert_eq!(map.floor(&1), Err(Error::NotFound));
    /// ```
    pub fn floor<Q>(&self, key: &Q) -> Result<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.floor(key).ok_or(Error::NotFound)
    }

    /// Returns the smallest key greater than or equal to `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if every key in the map is less than
    /// `key`, including when the map is empty.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_ost::{Error, OrderedMap};
    ///
    /// let map = OrderedMap::from([(2, ()), (5, ()), (8, ())]);
    /// assert_eq!(map.ceiling(&5), Ok(&5));
    /// assert_eq!(map.ceiling(&6), Ok(&8));
    /// assert_eq!(map.ceiling(&9), Err(Error::NotFound));
    /// ```
    pub fn ceiling<Q>(&self, key: &Q) -> Result<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.ceiling(key).ok_or(Error::NotFound)
    }

    /// Gets an iterator over the keys `k` with `lo <= k <= hi`, in ascending
    /// order.
    ///
    /// An inverted range (`lo > hi`) yields nothing.
    ///
    /// # Complexity
    ///
    /// O(log n + m) for `m` keys yielded.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_ost::OrderedMap;
    ///
    /// let map: OrderedMap<i32, ()> = (1..=10).map(|k| (k, ())).collect();
    ///
    /// let keys: Vec<_> = map.keys_in_range(&3, &6).copied().collect();
    /// assert_eq!(keys, [3, 4, 5, 6]);
    ///
    /// assert_eq!(map.keys_in_range(&6, &3).next(), None);
    /// ```
    pub fn keys_in_range<'a, Q>(&'a self, lo: &'a Q, hi: &'a Q) -> KeysInRange<'a, K, V, Q>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        KeysInRange::new(&self.raw, lo, hi)
    }

    /// Returns the number of keys `k` with `lo <= k <= hi`, or `0` if
    /// `lo > hi`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_ost::OrderedMap;
    ///
    /// let map: OrderedMap<i32, ()> = (0..100).step_by(10).map(|k| (k, ())).collect();
    /// assert_eq!(map.len_in_range(&10, &40), 4);
    /// assert_eq!(map.len_in_range(&11, &39), 2);
    /// assert_eq!(map.len_in_range(&40, &10), 0);
    /// ```
    pub fn len_in_range<Q>(&self, lo: &Q, hi: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        if lo > hi {
            return 0;
        }
        self.rank(hi) - self.rank(lo) + usize::from(self.contains(hi))
    }
}

/// Indexes into the map by rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use llrb_ost::{OrderedMap, Rank};
///
/// let map = OrderedMap::from([("a", 1), ("b", 2)]);
/// assert_eq!(map[Rank(1)], 2);
/// ```
impl<K, V> Index<Rank> for OrderedMap<K, V> {
    type Output = V;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.get_by_rank(rank.0).map(|(_, v)| v).expect("index out of bounds")
    }
}

/// Mutably indexes into the map by rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use llrb_ost::{OrderedMap, Rank};
///
/// let mut map = OrderedMap::from([("a", 1), ("b", 2)]);
/// map[Rank(1)] = 5;
///
/// assert_eq!(map.get(&"b"), Some(&5));
/// ```
impl<K, V> IndexMut<Rank> for OrderedMap<K, V> {
    fn index_mut(&mut self, rank: Rank) -> &mut Self::Output {
        self.get_by_rank_mut(rank.0).map(|(_, v)| v).expect("index out of bounds")
    }
}
