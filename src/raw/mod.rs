mod arena;
mod handle;
mod node;
mod raw_ordered_map;
mod size;

pub(crate) use handle::Handle;
pub(crate) use raw_ordered_map::{RawOrderedMap, Stack};
