//! Read-only Xilinx 7-series device model.
//!
//! Models the place-and-route database consumed by the kiln backend: the
//! tile grid, per-tile-type wire/PIP/BEL tables, and site instances. The
//! emission core reads this catalogue to translate bound cells and routed
//! nets into configuration features; nothing in this crate is mutated
//! after construction.

#![warn(missing_docs)]

pub mod device;
pub mod ids;
pub mod tiles;

pub use device::Device;
pub use ids::{BelId, PipId, TileId, WireId};
pub use tiles::{BelData, PipData, PipKind, SiteInst, Tile, TileTypeData, WireData, WireIntent};
