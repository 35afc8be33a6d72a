//! Left-leaning red-black order-statistic trees for Rust.
//!
//! This crate provides [`OrderedMap`], a sorted symbol table built on a
//! left-leaning red-black (LLRB) tree. Every node also records the size of
//! its subtree, which turns positional questions into O(log n) walks:
//!
//! - [`rank`](OrderedMap::rank) - How many keys are smaller than a given key
//! - [`select`](OrderedMap::select) - Which key sits at a given sorted position
//! - [`floor`](OrderedMap::floor) / [`ceiling`](OrderedMap::ceiling) - Nearest keys around a probe
//! - [`keys_in_range`](OrderedMap::keys_in_range) - Sorted keys within inclusive bounds
//! - Indexing by [`Rank`] - e.g., `map[Rank(0)]` for the first value
//!
//! # Example
//!
//! ```
//! use llrb_ost::{OrderedMap, Rank};
//!
//! let mut scores = OrderedMap::new();
//! scores.put("Alice", 100);
//! scores.put("Bob", 85);
//! scores.put("Carol", 92);
//!
//! assert_eq!(scores.get("Bob"), Some(&85));
//! assert_eq!(scores.len(), 3);
//!
//! // The median (rank 1 = second key in sorted order).
//! assert_eq!(scores.select(1), Ok(&"Bob"));
//! assert_eq!(scores.rank("Carol"), 2);
//! assert_eq!(scores[Rank(0)], 100);
//!
//! assert!(scores.check());
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **No unsafe code** - Nodes live in an arena and link to each other by handle
//! - **O(log n) everything** - Height stays within `2 log2(n + 1)` through inserts and deletes
//! - **Self-checking** - [`check`](OrderedMap::check) audits order, sizes, color and balance
//!
//! # Implementation
//!
//! The tree encodes a 2-3 tree: a red link glues a node to its parent to form
//! a 3-node, and red links always lean left. Insertion restores that shape on
//! the way back up with rotations and color flips. Deletion pushes a red link
//! down the search path ahead of it so the node finally removed is never a
//! lone 2-node, then rebalances on the way back up.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod order_statistic;
mod raw;

pub mod ordered_map;

pub use error::{Error, Result};
pub use order_statistic::Rank;
pub use ordered_map::OrderedMap;
