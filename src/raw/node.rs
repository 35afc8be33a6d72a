use super::handle::Handle;
use super::size::Size;

/// Color of the link from a node's parent down to the node.
///
/// A red link glues a node to its parent into a 2-3 tree 3-node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

impl Color {
    #[inline]
    pub(crate) const fn flipped(self) -> Self {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }
}

/// A single key/value pair plus its links into the tree.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    key: K,
    value: V,
    left: Option<Handle>,
    right: Option<Handle>,
    color: Color,
    // Nodes in the subtree rooted here, this one included.
    size: Size,
}

impl<K, V> Node<K, V> {
    /// Creates a detached leaf. New leaves always hang off a red link.
    pub(crate) fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
            color: Color::Red,
            size: Size::ONE,
        }
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Returns the key and value as a pair of references.
    #[inline]
    pub(crate) fn entry(&self) -> (&K, &V) {
        (&self.key, &self.value)
    }

    /// Returns the key alongside a mutable value; the key stays shared so the
    /// ordering cannot be disturbed.
    #[inline]
    pub(crate) fn entry_mut(&mut self) -> (&K, &mut V) {
        (&self.key, &mut self.value)
    }

    /// Swaps in a new key/value pair and returns the previous one.
    ///
    /// Used when a node adopts its in-order successor's entry, so the caller
    /// must keep the key within the node's ordering bounds.
    pub(crate) fn replace_entry(&mut self, key: K, value: V) -> (K, V) {
        let old_key = core::mem::replace(&mut self.key, key);
        let old_value = core::mem::replace(&mut self.value, value);
        (old_key, old_value)
    }

    pub(crate) fn into_entry(self) -> (K, V) {
        (self.key, self.value)
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) fn set_left(&mut self, left: Option<Handle>) {
        self.left = left;
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<Handle> {
        self.right
    }

    #[inline]
    pub(crate) fn set_right(&mut self, right: Option<Handle>) {
        self.right = right;
    }

    #[inline]
    pub(crate) fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    pub(crate) fn flip_color(&mut self) {
        self.color = self.color.flipped();
    }

    #[inline]
    pub(crate) fn size(&self) -> usize {
        self.size.to_usize()
    }

    pub(crate) fn set_size(&mut self, size: usize) {
        self.size = Size::from_usize(size);
    }
}
