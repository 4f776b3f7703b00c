//! Opaque ID types for device entities.
//!
//! [`TileId`] is a thin `u32` wrapper over the flat tile index; tile order
//! is row-major, so comparing raw indices orders tiles bottom-to-top the
//! way the grid does. Wires, PIPs, and BELs are tile-scoped: each is a
//! `(tile, index)` pair where the index points into the owning tile type's
//! table.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a tile: its flat row-major grid index.
    TileId
);

macro_rules! define_tile_scoped_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name {
            /// The tile this entity belongs to.
            pub tile: TileId,
            /// Index into the owning tile type's table.
            pub index: u32,
        }

        impl $name {
            /// Creates a tile-scoped ID from a tile and a table index.
            pub fn new(tile: TileId, index: u32) -> Self {
                Self { tile, index }
            }
        }
    };
}

define_tile_scoped_id!(
    /// A wire within a tile.
    WireId
);

define_tile_scoped_id!(
    /// A programmable interconnect point within a tile.
    PipId
);

define_tile_scoped_id!(
    /// A BEL (basic element of logic) within a tile.
    BelId
);
