use core::borrow::Borrow;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::Index;

use crate::error::{Error, Result};
use crate::raw::{Handle, RawOrderedMap, Stack};

mod capacity;
mod diagnostic;
mod order_statistic;

pub use crate::Rank;

/// An ordered map based on a [left-leaning red-black tree].
///
/// Given a key type with a [total order], an ordered map stores its entries in key order.
/// That means that keys must be of a type that implements the [`Ord`] trait,
/// such that two keys can always be compared to determine their [`Ordering`].
/// A different order is supplied by wrapping keys in a newtype such as
/// [`Reverse`](core::cmp::Reverse).
///
/// Besides point lookups the map answers order-statistic queries in
/// logarithmic time: [`rank`](OrderedMap::rank), [`select`](OrderedMap::select),
/// [`floor`](OrderedMap::floor), [`ceiling`](OrderedMap::ceiling) and
/// [`keys_in_range`](OrderedMap::keys_in_range). Every node records the size of
/// the subtree below it, which is what makes rank arithmetic cheap.
///
/// It is a logic error for a key to be modified in such a way that the key's ordering relative to
/// any other key, as determined by the [`Ord`] trait, changes while it is in the map. This is
/// normally only possible through [`Cell`], [`RefCell`], global state, I/O, or unsafe code.
/// The behavior resulting from such a logic error is not specified, but will be encapsulated to the
/// `OrderedMap` that observed the logic error and not result in undefined behavior.
///
/// # Examples
///
/// ```
/// use llrb_ost::{Error, OrderedMap};
///
/// let mut grades = OrderedMap::new();
/// grades.put("Carol", 92);
/// grades.put("Alice", 100);
/// grades.put("Bob", 85);
///
/// assert_eq!(grades.get("Bob"), Some(&85));
/// assert_eq!(grades.min(), Ok(&"Alice"));
/// assert_eq!(grades.select(2), Ok(&"Carol"));
/// assert_eq!(grades.rank("Bob"), 1);
///
/// grades.delete("Bob");
/// assert_eq!(grades.len(), 2);
/// assert_eq!(grades.floor("Bz"), Ok(&"Alice"));
/// assert_eq!(grades.ceiling("D"), Err(Error::NotFound));
/// ```
///
/// # Background
///
/// A red-black tree encodes a 2-3 tree as a binary tree: a 3-node becomes two
/// binary nodes joined by a red link, and every other link is black. The
/// left-leaning variant only ever attaches red links on the left, which cuts
/// the case analysis for rebalancing down to three local rules (rotate left,
/// rotate right, flip colors). Since every root-to-leaf path crosses the same
/// number of black links, the height never exceeds `2 * log2(n + 1)`.
///
/// Deletion descends top-down, pushing a red link ahead of itself with
/// `move_red_left`/`move_red_right` so the node finally removed is always red,
/// then repairs the path bottom-up with the same rules insertion uses.
///
/// [left-leaning red-black tree]: https://en.wikipedia.org/wiki/Left-leaning_red%E2%80%93black_tree
/// [total order]: https://en.wikipedia.org/wiki/Total_order
/// [`Ordering`]: core::cmp::Ordering
/// [`Cell`]: core::cell::Cell
/// [`RefCell`]: core::cell::RefCell
pub struct OrderedMap<K, V> {
    raw: RawOrderedMap<K, V>,
}

/// An iterator over the entries of an `OrderedMap`, in ascending key order.
///
/// This `struct` is created by the [`iter`] method on [`OrderedMap`]. See its
/// documentation for more.
///
/// # Examples
///
/// ```
/// use llrb_ost::OrderedMap;
///
/// let map = OrderedMap::from([(2, "b"), (1, "a")]);
/// let mut iter = map.iter();
/// assert_eq!(iter.next(), Some((&1, &"a")));
/// assert_eq!(iter.next(), Some((&2, &"b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: OrderedMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    raw: &'a RawOrderedMap<K, V>,
    stack: Stack,
    remaining: usize,
}

/// An iterator over the keys of an `OrderedMap`.
///
/// This `struct` is created by the [`keys`] method on [`OrderedMap`].
///
/// [`keys`]: OrderedMap::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of an `OrderedMap`.
///
/// This `struct` is created by the [`values`] method on [`OrderedMap`].
///
/// [`values`]: OrderedMap::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An owning iterator over the entries of an `OrderedMap`, sorted by key.
///
/// This `struct` is created by the [`into_iter`] method on [`OrderedMap`]
/// (provided by the [`IntoIterator`] trait).
///
/// # Examples
///
/// ```
/// use llrb_ost::OrderedMap;
///
/// let map = OrderedMap::from([(1, "a"), (2, "b")]);
/// let mut iter = map.into_iter();
/// assert_eq!(iter.next(), Some((1, "a")));
/// assert_eq!(iter.next_back(), Some((2, "b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<K, V> {
    inner: alloc::vec::IntoIter<(K, V)>,
}

/// An iterator over the keys of an `OrderedMap` that fall within `lo..=hi`.
///
/// This `struct` is created by the [`keys_in_range`] method on [`OrderedMap`].
/// Subtrees that lie wholly outside the bounds are never visited. A clone
/// resumes from the same position as the original.
///
/// [`keys_in_range`]: OrderedMap::keys_in_range
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct KeysInRange<'a, K, V, Q: ?Sized> {
    raw: &'a RawOrderedMap<K, V>,
    stack: Stack,
    lo: &'a Q,
    hi: &'a Q,
}

impl<K, V> OrderedMap<K, V> {
    /// Makes a new, empty `OrderedMap`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_ost::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    ///
    /// // entries can now be inserted into the empty map
    /// map.put(1, "a");
    /// ```
    #[must_use]
    pub const fn new() -> OrderedMap<K, V> {
        OrderedMap {
            raw: RawOrderedMap::new(),
        }
    }

    /// Clears the map, removing all elements.
    ///
    /// # Complexity
    ///
    /// O(n)
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_ost::OrderedMap;
    ///
    /// let mut a = OrderedMap::new();
    /// a.put(1, "a");
    /// a.clear();
    /// assert!(a.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the number of elements in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_ost::OrderedMap;
    ///
    /// let mut a = OrderedMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.put(1, "a");
    /// assert_eq!(a.len(), 1);
    /// ```
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_ost::OrderedMap;
    ///
    /// let mut a = OrderedMap::new();
    /// assert!(a.is_empty());
    /// a.put(1, "a");
    /// assert!(!a.is_empty());
    /// ```
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the number of links on the longest path from the root down to
    /// an empty subtree, or `-1` if the map is empty.
    ///
    /// # Complexity
    ///
    /// O(n)
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_ost::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// assert_eq!(map.height(), -1);
    /// map.put(1, ());
    /// assert_eq!(map.height(), 0);
    /// map.put(2, ());
    /// assert_eq!(map.height(), 1);
    /// ```
    #[must_use]
    pub fn height(&self) -> isize {
        self.raw.height()
    }

    /// Returns the smallest key in the map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_ost::{Error, OrderedMap};
    ///
    /// let mut map = OrderedMap::new();
    /// assert_eq!(map.min(), Err(Error::NotFound));
    /// map.put(2, "b");
    /// map.put(1, "a");
    /// assert_eq!(map.min(), Ok(&1));
    /// ```
    pub fn min(&self) -> Result<&K> {
        self.first_key_value().map(|(key, _)| key).ok_or(Error::NotFound)
    }

    /// Returns the largest key in the map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_ost::OrderedMap;
    ///
    /// let map = OrderedMap::from([(1, "a"), (2, "b")]);
    /// assert_eq!(map.max(), Ok(&2));
    /// ```
    pub fn max(&self) -> Result<&K> {
        self.last_key_value().map(|(key, _)| key).ok_or(Error::NotFound)
    }

    /// Returns the first key-value pair in the map.
    /// The key in this pair is the minimum key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_ost::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// assert_eq!(map.first_key_value(), None);
    /// map.put(1, "b");
    /// map.put(2, "a");
    /// assert_eq!(map.first_key_value(), Some((&1, &"b")));
    /// ```
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.first_key_value()
    }

    /// Returns the last key-value pair in the map.
    /// The key in this pair is the maximum key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_ost::OrderedMap;
    ///
    /// let map = OrderedMap::from([(1, "b"), (2, "a")]);
    /// assert_eq!(map.last_key_value(), Some((&2, &"a")));
    /// ```
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.last_key_value()
    }

    /// Removes and returns the entry with the smallest key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the map is empty; the map is unchanged.
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
    /// let mut map = OrderedMap::from([(1, "a"), (2, "b")]);
    /// assert_eq!(map.delete_min(), Ok((1, "a")));
    /// assert_eq!(map.delete_min(), Ok((2, "b")));
    /// assert_eq!(map.delete_min(), Err(Error::NotFound));
    /// ```
    pub fn delete_min(&mut self) -> Result<(K, V)> {
        self.raw.pop_first().ok_or(Error::NotFound)
    }

    /// Removes and returns the entry with the largest key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the map is empty; the map is unchanged.
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
    /// let mut map = OrderedMap::from([(1, "a"), (2, "b")]);
    /// assert_eq!(map.delete_max(), Ok((2, "b")));
    /// assert_eq!(map.delete_max(), Ok((1, "a")));
    /// assert_eq!(map.delete_max(), Err(Error::NotFound));
    /// ```
    pub fn delete_max(&mut self) -> Result<(K, V)> {
        self.raw.pop_last().ok_or(Error::NotFound)
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_ost::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.put(3, "c");
    /// map.put(2, "b");
    /// map.put(1, "a");
    ///
    /// for (key, value) in map.iter() {
    ///     println!("{key}: {value}");
    /// }
    ///
    /// let (first_key, first_value) = map.iter().next().unwrap();
    /// assert_eq!((*first_key, *first_value), (1, "a"));
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.raw)
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_ost::OrderedMap;
    ///
    /// let map = OrderedMap::from([(2, "b"), (1, "a")]);
    /// let keys: Vec<_> = map.keys().copied().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_ost::OrderedMap;
    ///
    /// let map = OrderedMap::from([(1, "hello"), (2, "goodbye")]);
    /// let values: Vec<&str> = map.values().copied().collect();
    /// assert_eq!(values, ["hello", "goodbye"]);
    /// ```
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Calls `visit` on every entry in ascending key order.
    ///
    /// The visitor only sees shared references, so the tree cannot be
    /// restructured while the walk is in progress.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_ost::OrderedMap;
    ///
    /// let map = OrderedMap::from([(3, 30), (1, 10), (2, 20)]);
    /// let mut seen = Vec::new();
    /// map.for_each_in_order(|key, value| seen.push(key + value));
    /// assert_eq!(seen, [11, 22, 33]);
    /// ```
    pub fn for_each_in_order<F>(&self, mut visit: F)
    where
        F: FnMut(&K, &V),
    {
        for (key, value) in self {
            visit(key, value);
        }
    }
}

impl<K: Ord, V> OrderedMap<K, V> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering
    /// on the borrowed form *must* match the ordering on the key type.
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
    /// map.put(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_ost::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.put(1, "a");
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map[&1], "b");
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get_mut(key)
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_ost::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.put(1, "a");
    /// assert!(map.contains(&1));
    /// assert!(!map.contains(&2));
    /// ```
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.contains_key(key)
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, `None` is returned and a new
    /// node joins the tree. If the key was present, its value is replaced in
    /// place, the old value is returned and the shape of the tree is left
    /// untouched.
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
    /// assert_eq!(map.put(37, "a"), None);
    /// assert_eq!(map.is_empty(), false);
    ///
    /// map.put(37, "b");
    /// assert_eq!(map.put(37, "c"), Some("b"));
    /// assert_eq!(map[&37], "c");
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        self.raw.insert(key, value)
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map. Deleting an absent key is a no-op.
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
    /// map.put(1, "a");
    /// assert_eq!(map.delete(&1), Some("a"));
    /// assert_eq!(map.delete(&1), None);
    /// ```
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove_entry(key).map(|(_, value)| value)
    }
}

impl<K: Clone, V: Clone> Clone for OrderedMap<K, V> {
    fn clone(&self) -> Self {
        OrderedMap { raw: self.raw.clone() }
    }
}

impl<K: Hash, V: Hash> Hash for OrderedMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (k, v) in self {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for OrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq> Eq for OrderedMap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        OrderedMap::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = OrderedMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for OrderedMap<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V> IntoIterator for OrderedMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Gets an owning iterator over the entries of the map, sorted by key.
    fn into_iter(mut self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<K, Q, V> Index<&Q> for OrderedMap<K, V>
where
    K: Borrow<Q> + Ord,
    Q: ?Sized + Ord,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `OrderedMap`.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for OrderedMap<K, V> {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

// ─── Iter ───────────────────────────────────────────────────────────────────

impl<'a, K, V> Iter<'a, K, V> {
    fn new(raw: &'a RawOrderedMap<K, V>) -> Self {
        let mut stack = Stack::new();
        raw.push_left_spine(&mut stack, raw.root());
        Iter {
            raw,
            stack,
            remaining: raw.len(),
        }
    }
}

impl<'a, K: 'a, V: 'a> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.stack.pop()?;
        let raw = self.raw;
        let node = raw.node(handle);
        raw.push_left_spine(&mut self.stack, node.right());
        self.remaining -= 1;
        Some(node.entry())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            raw: self.raw,
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

// ─── Keys / Values ──────────────────────────────────────────────────────────

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

// ─── IntoIter ───────────────────────────────────────────────────────────────

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}

// ─── KeysInRange ────────────────────────────────────────────────────────────

impl<'a, K, V, Q> KeysInRange<'a, K, V, Q>
where
    K: Borrow<Q>,
    Q: ?Sized + Ord,
{
    fn new(raw: &'a RawOrderedMap<K, V>, lo: &'a Q, hi: &'a Q) -> Self {
        let mut range = KeysInRange {
            raw,
            stack: Stack::new(),
            lo,
            hi,
        };
        range.descend(raw.root());
        range
    }

    /// Stacks the nodes along the left spine of `link` whose keys are not
    /// below `lo`, skipping subtrees that lie wholly below it.
    fn descend(&mut self, mut link: Option<Handle>) {
        while let Some(handle) = link {
            let node = self.raw.node(handle);
            if self.lo.cmp(node.key().borrow()).is_gt() {
                link = node.right();
            } else {
                self.stack.push(handle);
                link = node.left();
            }
        }
    }
}

impl<'a, K, V, Q> Iterator for KeysInRange<'a, K, V, Q>
where
    K: Borrow<Q> + 'a,
    Q: ?Sized + Ord,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let handle = self.stack.pop()?;
        let raw = self.raw;
        let node = raw.node(handle);
        if self.hi.cmp(node.key().borrow()).is_lt() {
            // Everything still stacked is larger still.
            self.stack.clear();
            return None;
        }

        self.descend(node.right());
        Some(node.key())
    }
}

impl<'a, K, V, Q> FusedIterator for KeysInRange<'a, K, V, Q>
where
    K: Borrow<Q> + 'a,
    Q: ?Sized + Ord,
{
}

impl<K, V, Q: ?Sized> Clone for KeysInRange<'_, K, V, Q> {
    fn clone(&self) -> Self {
        KeysInRange {
            raw: self.raw,
            stack: self.stack.clone(),
            lo: self.lo,
            hi: self.hi,
        }
    }
}

impl<K, V, Q> fmt::Debug for KeysInRange<'_, K, V, Q>
where
    K: Borrow<Q> + fmt::Debug,
    Q: ?Sized + Ord,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
