//! The bound physical design consumed by the kiln backend.
//!
//! After placement and routing, every cell is bound to a BEL and every net
//! carries the set of wires it occupies, each annotated with the PIP that
//! drove onto it. This crate models that state: cells with their parameter
//! and attribute maps, nets with their routing, and the per-tile slot
//! tables the packer fills in for logic and BRAM tiles.
//!
//! Cells and nets are stored in `BTreeMap`s keyed by name so that every
//! iteration over the design is deterministic; output ordering is part of
//! the emission contract.

pub mod design;
pub mod param;
pub mod pins;

pub use design::{
    BramTileCells, CellInfo, Design, LogicTileCells, NetInfo, PortRef, BEL_5LUT, BEL_6LUT,
    BEL_CARRY4, BEL_FF, BEL_FF2, BEL_RAM18_L, BEL_RAM18_U, BEL_RAM36, GND_NET, VCC_NET,
};
pub use param::ParamValue;
pub use pins::invertible_pins;
