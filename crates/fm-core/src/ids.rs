//! Strongly typed, zero-cost identifier wrappers.
//!
//! Vertices are identified by their coordinates (see [`crate::VertexKey`]);
//! `VertexId` is the dense index assigned to each distinct key at ingest, in
//! first-seen order.  `LinkId` is the position of a road link in the input
//! layer.

use std::fmt;

/// Wrap a `u32` index in a named, copyable id type.
///
/// The label is used by `Display`, so error messages read "link 12" rather
/// than a bare number.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty) => $label:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        $vis struct $name(pub $inner);

        impl $name {
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, " {}"), self.0)
            }
        }

        impl From<$name> for usize {
            fn from(id: $name) -> usize {
                id.index()
            }
        }

        /// Fails once the input layer outgrows the index width.
        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Dense index of a distinct network vertex, in first-seen order.
    pub struct VertexId(u32) => "vertex";
}

typed_id! {
    /// Index of a road link (one input line feature).
    pub struct LinkId(u32) => "link";
}
