use core::num::NonZero;

use super::handle::{Handle, RawHandle};

/// Number of nodes in a subtree, counting its root.
///
/// A stored subtree is never empty, so the count is kept as a `NonZero` and an
/// empty subtree is spelled `None` by the caller.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Size(NonZero<RawHandle>);

impl Size {
    // A subtree can never hold more nodes than there are handles.
    pub(crate) const MAX: usize = Handle::MAX + 1;
    pub(crate) const ONE: Self = Self::from_usize(1);

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) const fn from_usize(size: usize) -> Self {
        assert!(size <= Self::MAX, "`Size::from_usize()` - `size` > `Size::MAX`!");
        match NonZero::new(size as RawHandle) {
            Some(raw) => Self(raw),
            None => panic!("`Size::from_usize()` - `size` == 0!"),
        }
    }

    #[inline]
    pub(crate) const fn to_usize(self) -> usize {
        self.0.get() as usize
    }
}
