//! Tile-type and tile-instance data.
//!
//! A tile type owns the wire, PIP, and BEL tables shared by every tile of
//! that type; a tile instance contributes its name, grid position, and the
//! site instances that give type-level entities their placed names.

use serde::{Deserialize, Serialize};

/// Intent category of a wire.
///
/// Most wires are `Generic`; the pseudo-constant categories mark wires
/// that represent tied-off levels rather than routable signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireIntent {
    /// Ordinary routing or site wire.
    Generic,
    /// Destination represents a constant ground level.
    PseudoGnd,
    /// Destination represents a constant VCC level.
    PseudoVcc,
}

/// Kind of a PIP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipKind {
    /// A fabric routing switch; emitted as a FASM feature when used.
    TileRouting,
    /// A routing mux inside a site; emitted by the cell encoders instead.
    SitePip,
}

/// A wire definition within a tile type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireData {
    /// Type-level wire name (e.g. `LIOI_OLOGIC0_OQ`).
    pub name: String,
    /// Site slot this wire belongs to, or -1 for fabric wires.
    pub site: i32,
    /// Intent category.
    pub intent: WireIntent,
}

impl WireData {
    /// Creates a fabric wire with generic intent.
    pub fn fabric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            site: -1,
            intent: WireIntent::Generic,
        }
    }

    /// Creates a site wire with generic intent.
    pub fn site(name: impl Into<String>, site: i32) -> Self {
        Self {
            name: name.into(),
            site,
            intent: WireIntent::Generic,
        }
    }
}

/// A PIP definition within a tile type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipData {
    /// Index of the source wire in the tile type's wire table.
    pub src_index: u32,
    /// Index of the destination wire in the tile type's wire table.
    pub dst_index: u32,
    /// Fabric routing switch or site-internal mux.
    pub kind: PipKind,
    /// Marks a PIP that routes through a site (e.g. a LUT used as wire).
    pub is_route_thru: bool,
    /// For site PIPs: the routing BEL this mux setting belongs to.
    pub bel: Option<String>,
    /// For site PIPs: the selected input pin of that routing BEL.
    pub bel_pin: Option<String>,
}

impl PipData {
    /// Creates a fabric routing PIP.
    pub fn routing(src_index: u32, dst_index: u32) -> Self {
        Self {
            src_index,
            dst_index,
            kind: PipKind::TileRouting,
            is_route_thru: false,
            bel: None,
            bel_pin: None,
        }
    }

    /// Creates a site-internal routing mux setting.
    pub fn site_mux(
        src_index: u32,
        dst_index: u32,
        bel: impl Into<String>,
        pin: impl Into<String>,
    ) -> Self {
        Self {
            src_index,
            dst_index,
            kind: PipKind::SitePip,
            is_route_thru: false,
            bel: Some(bel.into()),
            bel_pin: Some(pin.into()),
        }
    }
}

/// A BEL definition within a tile type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BelData {
    /// BEL name within its site (e.g. `AFF`, `IOB33S/O_ININV`).
    pub name: String,
    /// Site slot this BEL belongs to.
    pub site: i32,
    /// BEL pin to wire-table-index mapping.
    pub pins: Vec<(String, u32)>,
}

impl BelData {
    /// Creates a BEL with the given pin-to-wire mapping.
    pub fn new(name: impl Into<String>, site: i32, pins: Vec<(String, u32)>) -> Self {
        Self {
            name: name.into(),
            site,
            pins,
        }
    }
}

/// A tile type: the wire/PIP/BEL catalogue shared by all tiles of the type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TileTypeData {
    /// Type name (e.g. `CLBLM_L`, `LIOI3`, `BRAM_R`).
    pub name: String,
    /// Wires owned by this tile type.
    pub wires: Vec<WireData>,
    /// PIPs owned by this tile type.
    pub pips: Vec<PipData>,
    /// BELs owned by this tile type.
    pub bels: Vec<BelData>,
}

impl TileTypeData {
    /// Creates an empty tile type with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A site instance within a tile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteInst {
    /// Placed site name (e.g. `SLICE_X0Y0`, `IOB_X0Y42`).
    pub name: String,
    /// X location of the site within the tile.
    pub x: i32,
    /// Y location of the site within the tile.
    pub y: i32,
}

impl SiteInst {
    /// Creates a site instance.
    pub fn new(name: impl Into<String>, x: i32, y: i32) -> Self {
        Self {
            name: name.into(),
            x,
            y,
        }
    }
}

/// A tile instance in the device grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    /// Instance name (e.g. `CLBLM_L_X10Y100`).
    pub name: String,
    /// Index into the device's tile type table.
    pub type_index: u32,
    /// Site instances, aligned with the tile type's site slots.
    pub sites: Vec<SiteInst>,
}

impl Tile {
    /// Creates a tile instance of the given type.
    pub fn new(name: impl Into<String>, type_index: u32, sites: Vec<SiteInst>) -> Self {
        Self {
            name: name.into(),
            type_index,
            sites,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fabric_wire_has_no_site() {
        let w = WireData::fabric("INT_WIRE");
        assert_eq!(w.site, -1);
        assert_eq!(w.intent, WireIntent::Generic);
    }

    #[test]
    fn site_wire_records_slot() {
        let w = WireData::site("AMUX", 0);
        assert_eq!(w.site, 0);
    }

    #[test]
    fn routing_pip_kind() {
        let p = PipData::routing(0, 1);
        assert_eq!(p.kind, PipKind::TileRouting);
        assert!(p.bel.is_none());
        assert!(!p.is_route_thru);
    }

    #[test]
    fn site_mux_carries_bel_and_pin() {
        let p = PipData::site_mux(0, 1, "AFFMUX", "AX");
        assert_eq!(p.kind, PipKind::SitePip);
        assert_eq!(p.bel.as_deref(), Some("AFFMUX"));
        assert_eq!(p.bel_pin.as_deref(), Some("AX"));
    }

    #[test]
    fn tile_type_starts_empty() {
        let tt = TileTypeData::new("CLBLL_L");
        assert_eq!(tt.name, "CLBLL_L");
        assert!(tt.wires.is_empty());
        assert!(tt.pips.is_empty());
        assert!(tt.bels.is_empty());
    }

    #[test]
    fn serde_roundtrip() {
        let mut tt = TileTypeData::new("LIOI3");
        tt.wires.push(WireData::fabric("IOI_OLOGIC0_D1"));
        tt.pips.push(PipData::routing(0, 0));
        tt.bels.push(BelData::new("OLOGIC0", 0, vec![("D1".into(), 0)]));
        let json = serde_json::to_string(&tt).unwrap();
        let back: TileTypeData = serde_json::from_str(&json).unwrap();
        assert_eq!(back.wires.len(), 1);
        assert_eq!(back.bels[0].name, "OLOGIC0");
    }
}
