use alloc::string::String;
use core::fmt::{self, Write};

use super::OrderedMap;
use crate::raw::Handle;

// Columns of indentation per level of depth in `render`.
const INDENT: usize = 3;

impl<K, V> OrderedMap<K, V> {
    /// Returns true if every path from the root to an empty subtree crosses
    /// the same number of black links.
    ///
    /// This always holds for a map built through the public API.
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.raw.is_balanced()
    }

    /// Renders the tree sideways: right subtree first, then the node, then
    /// the left subtree, with each level of depth indented three columns.
    ///
    /// When `annotate` is set each key is followed by `:R` or `:B` for the
    /// color of the link into it. Every line ends with `\n`; an empty map
    /// renders as the empty string.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_ost::OrderedMap;
    ///
    /// let map = OrderedMap::from([('A', ()), ('B', ()), ('C', ())]);
    /// assert_eq!(map.render(false), "   C\nB\n   A\n");
    /// assert_eq!(map.render(true), "   C:B\nB:B\n   A:B\n");
    /// ```
    #[must_use]
    pub fn render(&self, annotate: bool) -> String
    where
        K: fmt::Display,
    {
        let mut out = String::new();
        // Writing into a `String` cannot fail.
        let _ = self.render_at(&mut out, self.raw.root(), 0, annotate);
        out
    }

    fn render_at(&self, out: &mut String, link: Option<Handle>, depth: usize, annotate: bool) -> fmt::Result
    where
        K: fmt::Display,
    {
        let Some(handle) = link else {
            return Ok(());
        };

        let node = self.raw.node(handle);
        self.render_at(out, node.right(), depth + 1, annotate)?;
        write!(out, "{:indent$}{}", "", node.key(), indent = depth * INDENT)?;
        if annotate {
            out.push_str(if node.is_red() { ":R" } else { ":B" });
        }
        out.push('\n');
        self.render_at(out, node.left(), depth + 1, annotate)
    }
}

impl<K: Ord, V> OrderedMap<K, V> {
    /// Runs every structural self-check and returns true if all pass:
    /// symmetric order, subtree sizes, rank/select agreement, 2-3 shape and
    /// perfect black balance.
    ///
    /// # Complexity
    ///
    /// O(n log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_ost::OrderedMap;
    ///
    /// let mut map: OrderedMap<u32, u32> = (0..100).map(|k| (k, k)).collect();
    /// map.delete(&42);
    /// assert!(map.check());
    /// ```
    #[must_use]
    pub fn check(&self) -> bool {
        self.raw.is_bst()
            && self.raw.is_size_consistent()
            && self.raw.is_rank_consistent()
            && self.raw.is_two_three()
            && self.raw.is_balanced()
    }
}
