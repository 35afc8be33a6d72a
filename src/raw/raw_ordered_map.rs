use core::borrow::Borrow;
use core::cmp::Ordering;

use log::{debug, trace};
use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Node};

/// Stack of pending handles for an in-order walk. A left-leaning red-black
/// tree of `n` nodes is at most `2 * log2(n)` deep, so this rarely spills.
pub(crate) type Stack = SmallVec<[Handle; 32]>;

/// The left-leaning red-black tree backing `OrderedMap`.
///
/// Every recursive mutation takes the root of a subtree and returns the root
/// of the rebuilt subtree, which the caller stores back into its own link.
#[derive(Clone)]
pub(crate) struct RawOrderedMap<K, V> {
    /// Arena owning every node of the tree.
    nodes: Arena<Node<K, V>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
}

impl<K, V> RawOrderedMap<K, V> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
        }
    }

    /// Returns the number of key-value pairs in the tree.
    pub(crate) fn len(&self) -> usize {
        self.size_of(self.root)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn clear(&mut self) {
        debug!("clear: dropping {} nodes", self.nodes.len());
        self.nodes.clear();
        self.root = None;
    }

    pub(crate) fn root(&self) -> Option<Handle> {
        self.root
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V> {
        self.nodes.get(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut Node<K, V> {
        self.nodes.get_mut(handle)
    }

    /// Pushes `link` and its chain of left descendants onto `stack`.
    pub(crate) fn push_left_spine(&self, stack: &mut Stack, mut link: Option<Handle>) {
        while let Some(handle) = link {
            stack.push(handle);
            link = self.node(handle).left();
        }
    }

    /// Moves every entry out of the tree in ascending key order.
    ///
    /// O(n): nodes are taken from the arena as the walk passes them, with no
    /// rebalancing in between.
    pub(crate) fn drain_to_vec(&mut self) -> alloc::vec::Vec<(K, V)> {
        let len = self.len();
        debug!("drain_to_vec: draining {len} entries");

        let mut entries = alloc::vec::Vec::with_capacity(len);
        let mut stack = Stack::new();
        let root = self.root.take();
        self.push_left_spine(&mut stack, root);
        while let Some(handle) = stack.pop() {
            let node = self.nodes.take(handle);
            self.push_left_spine(&mut stack, node.right());
            entries.push(node.into_entry());
        }

        self.nodes.clear();
        entries
    }

    // ─── Link predicates ────────────────────────────────────────────────────

    /// True if the link to `link` is red. An empty subtree always hangs off
    /// a black link.
    #[inline]
    fn is_red(&self, link: Option<Handle>) -> bool {
        link.is_some_and(|handle| self.node(handle).is_red())
    }

    #[inline]
    fn left_of(&self, link: Option<Handle>) -> Option<Handle> {
        link.and_then(|handle| self.node(handle).left())
    }

    #[inline]
    pub(crate) fn size_of(&self, link: Option<Handle>) -> usize {
        link.map_or(0, |handle| self.node(handle).size())
    }

    fn update_size(&mut self, handle: Handle) {
        let node = self.node(handle);
        let size = 1 + self.size_of(node.left()) + self.size_of(node.right());
        self.node_mut(handle).set_size(size);
    }

    // ─── Local restructuring ────────────────────────────────────────────────

    /// Turns the red right link of `h` into a red left link.
    fn rotate_left(&mut self, h: Handle) -> Handle {
        let x = self.node(h).right().expect("`rotate_left()` - no right child to promote");
        debug_assert!(self.node(x).is_red(), "`rotate_left()` - rotating a black link");

        let inner = self.node(x).left();
        let color = self.node(h).color();
        let size = self.node(h).size();

        let node = self.node_mut(h);
        node.set_right(inner);
        node.set_color(Color::Red);

        let promoted = self.node_mut(x);
        promoted.set_left(Some(h));
        promoted.set_color(color);
        promoted.set_size(size);

        self.update_size(h);
        x
    }

    /// Turns the red left link of `h` into a red right link.
    fn rotate_right(&mut self, h: Handle) -> Handle {
        let x = self.node(h).left().expect("`rotate_right()` - no left child to promote");
        debug_assert!(self.node(x).is_red(), "`rotate_right()` - rotating a black link");

        let inner = self.node(x).right();
        let color = self.node(h).color();
        let size = self.node(h).size();

        let node = self.node_mut(h);
        node.set_left(inner);
        node.set_color(Color::Red);

        let promoted = self.node_mut(x);
        promoted.set_right(Some(h));
        promoted.set_color(color);
        promoted.set_size(size);

        self.update_size(h);
        x
    }

    /// Recolors `h` and both of its children.
    fn flip_colors(&mut self, h: Handle) {
        let node = self.node(h);
        let left = node.left().expect("`flip_colors()` - missing left child");
        let right = node.right().expect("`flip_colors()` - missing right child");

        self.node_mut(h).flip_color();
        self.node_mut(left).flip_color();
        self.node_mut(right).flip_color();
    }

    /// Restores the local shape after an insertion below `h`.
    fn fix_up(&mut self, mut h: Handle) -> Handle {
        if self.is_red(self.node(h).right()) && !self.is_red(self.node(h).left()) {
            h = self.rotate_left(h);
        }
        let left = self.node(h).left();
        if self.is_red(left) && self.is_red(self.left_of(left)) {
            h = self.rotate_right(h);
        }
        if self.is_red(self.node(h).left()) && self.is_red(self.node(h).right()) {
            self.flip_colors(h);
        }

        self.update_size(h);
        h
    }

    /// Restores the local shape after a deletion below `h`.
    fn balance(&mut self, mut h: Handle) -> Handle {
        if self.is_red(self.node(h).right()) {
            h = self.rotate_left(h);
        }
        let left = self.node(h).left();
        if self.is_red(left) && self.is_red(self.left_of(left)) {
            h = self.rotate_right(h);
        }
        if self.is_red(self.node(h).left()) && self.is_red(self.node(h).right()) {
            self.flip_colors(h);
        }

        self.update_size(h);
        h
    }

    /// With `h` red and both `h.left` and `h.left.left` black, makes `h.left`
    /// or one of its children red.
    fn move_red_left(&mut self, mut h: Handle) -> Handle {
        self.flip_colors(h);

        let right = self.node(h).right();
        if self.is_red(self.left_of(right)) {
            let right = right.expect("`move_red_left()` - missing right child");
            let right = self.rotate_right(right);
            self.node_mut(h).set_right(Some(right));
            h = self.rotate_left(h);
            self.flip_colors(h);
        }
        h
    }

    /// With `h` red and both `h.right` and `h.right.left` black, makes
    /// `h.right` or one of its children red.
    fn move_red_right(&mut self, mut h: Handle) -> Handle {
        self.flip_colors(h);

        let left = self.node(h).left();
        if self.is_red(self.left_of(left)) {
            h = self.rotate_right(h);
            self.flip_colors(h);
        }
        h
    }

    /// Before a top-down deletion, lends the root a red link when it is a
    /// 2-node so the descent has something to push downward.
    fn redden_root(&mut self, root: Handle) {
        let node = self.node(root);
        if !self.is_red(node.left()) && !self.is_red(node.right()) {
            self.node_mut(root).set_color(Color::Red);
        }
    }

    /// Reinstates the black root link after a mutation.
    fn blacken_root(&mut self) {
        if let Some(root) = self.root {
            self.node_mut(root).set_color(Color::Black);
        }
    }

    // ─── Deletion ───────────────────────────────────────────────────────────

    /// Removes the minimum node of the subtree at `h`.
    fn remove_min_at(&mut self, mut h: Handle) -> (Option<Handle>, (K, V)) {
        let Some(left) = self.node(h).left() else {
            debug_assert!(self.node(h).right().is_none(), "`remove_min_at()` - leaf has a right child");
            trace!("remove_min_at: removing node {h:?}");
            return (None, self.nodes.take(h).into_entry());
        };

        if !self.is_red(Some(left)) && !self.is_red(self.node(left).left()) {
            h = self.move_red_left(h);
        }

        let left = self.node(h).left().expect("`remove_min_at()` - left subtree vanished");
        let (left, removed) = self.remove_min_at(left);
        self.node_mut(h).set_left(left);
        (Some(self.balance(h)), removed)
    }

    /// Removes the maximum node of the subtree at `h`.
    fn remove_max_at(&mut self, mut h: Handle) -> (Option<Handle>, (K, V)) {
        if self.is_red(self.node(h).left()) {
            h = self.rotate_right(h);
        }

        let Some(right) = self.node(h).right() else {
            debug_assert!(self.node(h).left().is_none(), "`remove_max_at()` - leaf has a left child");
            trace!("remove_max_at: removing node {h:?}");
            return (None, self.nodes.take(h).into_entry());
        };

        if !self.is_red(Some(right)) && !self.is_red(self.node(right).left()) {
            h = self.move_red_right(h);
        }

        let right = self.node(h).right().expect("`remove_max_at()` - right subtree vanished");
        let (right, removed) = self.remove_max_at(right);
        self.node_mut(h).set_right(right);
        (Some(self.balance(h)), removed)
    }

    /// Removes and returns the entry with the smallest key.
    pub(crate) fn pop_first(&mut self) -> Option<(K, V)> {
        let root = self.root?;
        self.redden_root(root);
        let (root, removed) = self.remove_min_at(root);
        self.root = root;
        self.blacken_root();
        Some(removed)
    }

    /// Removes and returns the entry with the largest key.
    pub(crate) fn pop_last(&mut self) -> Option<(K, V)> {
        let root = self.root?;
        self.redden_root(root);
        let (root, removed) = self.remove_max_at(root);
        self.root = root;
        self.blacken_root();
        Some(removed)
    }

    // ─── Order statistics that need no comparisons ──────────────────────────

    /// Returns the leftmost node of the subtree at `h`.
    fn min_at(&self, mut h: Handle) -> Handle {
        while let Some(left) = self.node(h).left() {
            h = left;
        }
        h
    }

    /// Returns the rightmost node of the subtree at `h`.
    fn max_at(&self, mut h: Handle) -> Handle {
        while let Some(right) = self.node(h).right() {
            h = right;
        }
        h
    }

    pub(crate) fn first_key_value(&self) -> Option<(&K, &V)> {
        let root = self.root?;
        Some(self.node(self.min_at(root)).entry())
    }

    pub(crate) fn last_key_value(&self) -> Option<(&K, &V)> {
        let root = self.root?;
        Some(self.node(self.max_at(root)).entry())
    }

    /// Finds the node holding the key of the given rank.
    fn select_handle(&self, rank: usize) -> Option<Handle> {
        if rank >= self.len() {
            return None;
        }

        let mut link = self.root;
        let mut remaining = rank;
        while let Some(handle) = link {
            let node = self.node(handle);
            let left_size = self.size_of(node.left());
            match remaining.cmp(&left_size) {
                Ordering::Less => link = node.left(),
                Ordering::Equal => return Some(handle),
                Ordering::Greater => {
                    remaining -= left_size + 1;
                    link = node.right();
                }
            }
        }

        // Unreachable while subtree sizes are consistent.
        None
    }

    /// Gets an element by its rank (0-indexed position in sorted order).
    pub(crate) fn get_by_rank(&self, rank: usize) -> Option<(&K, &V)> {
        self.select_handle(rank).map(|handle| self.node(handle).entry())
    }

    pub(crate) fn get_by_rank_mut(&mut self, rank: usize) -> Option<(&K, &mut V)> {
        let handle = self.select_handle(rank)?;
        Some(self.node_mut(handle).entry_mut())
    }

    /// Number of edges on the longest path from the root to an empty
    /// subtree; `-1` for an empty tree.
    pub(crate) fn height(&self) -> isize {
        self.height_of(self.root)
    }

    fn height_of(&self, link: Option<Handle>) -> isize {
        match link {
            None => -1,
            Some(handle) => {
                let node = self.node(handle);
                1 + self.height_of(node.left()).max(self.height_of(node.right()))
            }
        }
    }

    // ─── Diagnostics ────────────────────────────────────────────────────────

    /// Returns true if every root-to-empty-subtree path crosses the same
    /// number of black links.
    pub(crate) fn is_balanced(&self) -> bool {
        self.black_height(self.root).is_some()
    }

    /// Black links below and including `link`, or `None` when two paths
    /// disagree.
    fn black_height(&self, link: Option<Handle>) -> Option<usize> {
        let Some(handle) = link else {
            return Some(0);
        };

        let node = self.node(handle);
        let left = self.black_height(node.left())?;
        let right = self.black_height(node.right())?;
        (left == right).then(|| left + usize::from(!node.is_red()))
    }

    /// Returns true if every stored subtree size matches its actual size.
    pub(crate) fn is_size_consistent(&self) -> bool {
        self.counted_size(self.root).is_some()
    }

    fn counted_size(&self, link: Option<Handle>) -> Option<usize> {
        let Some(handle) = link else {
            return Some(0);
        };

        let node = self.node(handle);
        let size = 1 + self.counted_size(node.left())? + self.counted_size(node.right())?;
        (size == node.size()).then_some(size)
    }

    /// Returns true if no link leans right and no two red links are
    /// consecutive, i.e. the tree is a faithful 2-3 tree encoding.
    pub(crate) fn is_two_three(&self) -> bool {
        !self.is_red(self.root) && self.is_two_three_at(self.root)
    }

    fn is_two_three_at(&self, link: Option<Handle>) -> bool {
        let Some(handle) = link else {
            return true;
        };

        let node = self.node(handle);
        if self.is_red(node.right()) || (node.is_red() && self.is_red(node.left())) {
            return false;
        }
        self.is_two_three_at(node.left()) && self.is_two_three_at(node.right())
    }
}

impl<K: Ord, V> RawOrderedMap<K, V> {
    /// Compares a lookup key against the key stored at `handle`.
    #[inline]
    fn compare<Q>(&self, key: &Q, handle: Handle) -> Ordering
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        key.cmp(self.node(handle).key().borrow())
    }

    /// Searches for a key and returns the handle of its node if found.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut link = self.root;
        while let Some(handle) = link {
            match self.compare(key, handle) {
                Ordering::Less => link = self.node(handle).left(),
                Ordering::Greater => link = self.node(handle).right(),
                Ordering::Equal => return Some(handle),
            }
        }
        None
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).map(|handle| self.node(handle).value())
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key)?;
        Some(self.node_mut(handle).value_mut())
    }

    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).is_some()
    }

    // ─── Insertion ──────────────────────────────────────────────────────────

    /// Inserts a key-value pair into the tree.
    /// Returns the old value if the key was already present.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        let (root, replaced) = self.insert_at(self.root, key, value);
        self.root = Some(root);
        self.blacken_root();
        replaced
    }

    fn insert_at(&mut self, link: Option<Handle>, key: K, value: V) -> (Handle, Option<V>) {
        let Some(h) = link else {
            let handle = self.nodes.alloc(Node::new(key, value));
            trace!("insert_at: allocated node {handle:?}");
            return (handle, None);
        };

        let replaced = match key.cmp(self.node(h).key()) {
            Ordering::Less => {
                let (left, replaced) = self.insert_at(self.node(h).left(), key, value);
                self.node_mut(h).set_left(Some(left));
                replaced
            }
            Ordering::Greater => {
                let (right, replaced) = self.insert_at(self.node(h).right(), key, value);
                self.node_mut(h).set_right(Some(right));
                replaced
            }
            Ordering::Equal => {
                trace!("insert_at: replacing value of node {h:?}");
                return (h, Some(core::mem::replace(self.node_mut(h).value_mut(), value)));
            }
        };

        (self.fix_up(h), replaced)
    }

    // ─── Deletion ───────────────────────────────────────────────────────────

    /// Removes a key from the tree and returns the key-value pair.
    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let root = self.root?;
        self.search(key)?;

        self.redden_root(root);
        let (root, removed) = self.remove_at(root, key);
        self.root = root;
        self.blacken_root();
        Some(removed)
    }

    /// Removes `key`, which must be present, from the subtree at `h`.
    fn remove_at<Q>(&mut self, mut h: Handle, key: &Q) -> (Option<Handle>, (K, V))
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let removed = if self.compare(key, h) == Ordering::Less {
            let left = self.node(h).left();
            if !self.is_red(left) && !self.is_red(self.left_of(left)) {
                h = self.move_red_left(h);
            }

            let left = self.node(h).left().expect("`remove_at()` - key is present, so the left subtree exists");
            let (left, removed) = self.remove_at(left, key);
            self.node_mut(h).set_left(left);
            removed
        } else {
            if self.is_red(self.node(h).left()) {
                h = self.rotate_right(h);
            }
            if self.compare(key, h) == Ordering::Equal && self.node(h).right().is_none() {
                debug_assert!(self.node(h).left().is_none(), "`remove_at()` - leaf has a left child");
                trace!("remove_at: removing node {h:?}");
                return (None, self.nodes.take(h).into_entry());
            }

            let right = self.node(h).right();
            if !self.is_red(right) && !self.is_red(self.left_of(right)) {
                h = self.move_red_right(h);
            }

            let right = self.node(h).right().expect("`remove_at()` - key is present, so the right subtree exists");
            if self.compare(key, h) == Ordering::Equal {
                // Adopt the in-order successor's entry and excise the donor.
                let (right, (successor_key, successor_value)) = self.remove_min_at(right);
                self.node_mut(h).set_right(right);
                self.node_mut(h).replace_entry(successor_key, successor_value)
            } else {
                let (right, removed) = self.remove_at(right, key);
                self.node_mut(h).set_right(right);
                removed
            }
        };

        (Some(self.balance(h)), removed)
    }

    // ─── Order statistics ───────────────────────────────────────────────────

    /// Number of keys strictly less than `key`, whether or not it is present.
    pub(crate) fn rank<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut rank = 0;
        let mut link = self.root;
        while let Some(handle) = link {
            let node = self.node(handle);
            match self.compare(key, handle) {
                Ordering::Less => link = node.left(),
                Ordering::Equal => return rank + self.size_of(node.left()),
                Ordering::Greater => {
                    rank += 1 + self.size_of(node.left());
                    link = node.right();
                }
            }
        }
        rank
    }

    /// Returns the largest key less than or equal to `key`.
    pub(crate) fn floor<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut best = None;
        let mut link = self.root;
        while let Some(handle) = link {
            let node = self.node(handle);
            match self.compare(key, handle) {
                Ordering::Less => link = node.left(),
                Ordering::Equal => return Some(node.key()),
                Ordering::Greater => {
                    best = Some(node.key());
                    link = node.right();
                }
            }
        }
        best
    }

    /// Returns the smallest key greater than or equal to `key`.
    pub(crate) fn ceiling<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut best = None;
        let mut link = self.root;
        while let Some(handle) = link {
            let node = self.node(handle);
            match self.compare(key, handle) {
                Ordering::Greater => link = node.right(),
                Ordering::Equal => return Some(node.key()),
                Ordering::Less => {
                    best = Some(node.key());
                    link = node.left();
                }
            }
        }
        best
    }

    // ─── Diagnostics ────────────────────────────────────────────────────────

    /// Returns true if an in-order walk yields strictly ascending keys.
    pub(crate) fn is_bst(&self) -> bool {
        self.is_bst_at(self.root, None, None)
    }

    fn is_bst_at(&self, link: Option<Handle>, lower: Option<&K>, upper: Option<&K>) -> bool {
        let Some(handle) = link else {
            return true;
        };

        let node = self.node(handle);
        let key = node.key();
        if lower.is_some_and(|lower| key <= lower) || upper.is_some_and(|upper| key >= upper) {
            return false;
        }
        self.is_bst_at(node.left(), lower, Some(key)) && self.is_bst_at(node.right(), Some(key), upper)
    }

    /// Returns true if `rank` and select agree for every rank and every key.
    pub(crate) fn is_rank_consistent(&self) -> bool {
        (0..self.len()).all(|rank| self.get_by_rank(rank).is_some_and(|(key, _)| self.rank(key) == rank))
    }
}
