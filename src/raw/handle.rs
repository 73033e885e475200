use core::num::NonZero;

// Test builds narrow the handle so arena exhaustion is reachable without
// allocating billions of nodes.
#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// A 1-based index naming a node slot in the arena.
///
/// Every node carries two `Option<Handle>` child slots and the tree keeps an
/// `Option<Handle>` root, so the `NonZero` niche keeps each of those at the
/// raw integer's width. Four bytes address over four billion nodes, and the
/// balance invariant keeps even a tree that size under height 46, which is
/// why node heights fit in a `u8`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    /// Largest arena index a handle can name.
    pub(crate) const MAX: usize = RawHandle::MAX as usize - 1;

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - arena index is not addressable!");
        #[allow(clippy::cast_possible_truncation)]
        let raw = index as RawHandle + 1;
        // Nonzero after the bound check above.
        match NonZero::new(raw) {
            Some(raw) => Self(raw),
            None => unreachable!(),
        }
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        self.0.get() as usize - 1
    }
}
