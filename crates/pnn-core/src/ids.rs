//! Network-wide indices.
//!
//! Every index is a `u32` newtype numbered in assembly order.  The inner
//! value is public; `.index()` is the conventional way to address the
//! network's `Vec`s with it.

use std::fmt;

macro_rules! network_index {
    ($(#[$attr:meta])* $name:ident, $prefix:literal) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub u32);

        impl $name {
            /// Placeholder for an index not yet assigned.
            pub const INVALID: $name = $name(u32::MAX);

            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// `None` if `index` does not fit in a `u32`.
            #[inline]
            pub fn from_index(index: usize) -> Option<Self> {
                u32::try_from(index).ok().map($name)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

network_index! {
    /// Global neuron index: population declaration order, then the
    /// population-local index.  Doubles as the raster row.
    NeuronId, "neuron #"
}

network_index! {
    /// Population index, global across groups.  Appears in instance names
    /// (`p{id}(0007)`).
    PopulationId, "p"
}

network_index! {
    ProjectionId, "projection #"
}

network_index! {
    GroupId, "group #"
}
