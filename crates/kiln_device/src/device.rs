//! The assembled device: tile grid plus lookup helpers.

use crate::ids::{BelId, PipId, TileId, WireId};
use crate::tiles::{BelData, PipData, Tile, TileTypeData, WireData, WireIntent};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A complete 7-series device model.
///
/// Holds the tile grid (row-major, so a tile's flat index orders it within
/// the grid), the tile type catalogue, and the HCLK association for I/O
/// tiles. Name indices are rebuilt on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    /// Device part name (e.g. `xc7a35t`).
    pub part: String,
    /// Tile type catalogue.
    pub tile_types: Vec<TileTypeData>,
    /// All tiles, row-major.
    pub tiles: Vec<Tile>,
    /// Grid width in tiles.
    pub width: u32,
    /// HCLK tile serving each I/O tile's bank.
    pub io_hclk: HashMap<TileId, TileId>,
    /// Auxiliary index: `TILE/WIRE` name to wire (rebuilt on deserialization).
    #[serde(skip)]
    wire_by_name: HashMap<String, WireId>,
    /// Auxiliary index: `SITE/BEL` name to BEL (rebuilt on deserialization).
    #[serde(skip)]
    bel_by_name: HashMap<String, BelId>,
}

impl Device {
    /// Assembles a device from its tile types and tile grid.
    pub fn new(part: impl Into<String>, tile_types: Vec<TileTypeData>, tiles: Vec<Tile>, width: u32) -> Self {
        let mut dev = Self {
            part: part.into(),
            tile_types,
            tiles,
            width,
            io_hclk: HashMap::new(),
            wire_by_name: HashMap::new(),
            bel_by_name: HashMap::new(),
        };
        dev.rebuild_indices();
        dev
    }

    /// Rebuilds the name indices after deserialization or tile edits.
    pub fn rebuild_indices(&mut self) {
        self.wire_by_name.clear();
        self.bel_by_name.clear();
        for (ti, tile) in self.tiles.iter().enumerate() {
            let tid = TileId::from_raw(ti as u32);
            let tt = &self.tile_types[tile.type_index as usize];
            for (wi, wd) in tt.wires.iter().enumerate() {
                self.wire_by_name.insert(
                    format!("{}/{}", tile.name, wd.name),
                    WireId::new(tid, wi as u32),
                );
            }
            for (bi, bd) in tt.bels.iter().enumerate() {
                if bd.site >= 0 {
                    if let Some(site) = tile.sites.get(bd.site as usize) {
                        self.bel_by_name.insert(
                            format!("{}/{}", site.name, bd.name),
                            BelId::new(tid, bi as u32),
                        );
                    }
                }
            }
        }
    }

    /// Number of tiles in the grid.
    pub fn num_tiles(&self) -> usize {
        self.tiles.len()
    }

    /// Grid row of a tile (flat index divided by grid width).
    pub fn tile_row(&self, tile: TileId) -> u32 {
        tile.as_raw() / self.width
    }

    /// The tile instance.
    pub fn tile(&self, tile: TileId) -> &Tile {
        &self.tiles[tile.as_raw() as usize]
    }

    /// The tile's instance name.
    pub fn tile_name(&self, tile: TileId) -> &str {
        &self.tile(tile).name
    }

    /// The tile's type table.
    pub fn tile_type(&self, tile: TileId) -> &TileTypeData {
        &self.tile_types[self.tile(tile).type_index as usize]
    }

    /// The tile's type name.
    pub fn tile_type_name(&self, tile: TileId) -> &str {
        &self.tile_type(tile).name
    }

    /// Iterates over `(tile, instance name, type name)` in grid order.
    pub fn tiles_and_types(&self) -> impl Iterator<Item = (TileId, &str, &str)> {
        self.tiles.iter().enumerate().map(|(i, t)| {
            (
                TileId::from_raw(i as u32),
                t.name.as_str(),
                self.tile_types[t.type_index as usize].name.as_str(),
            )
        })
    }

    /// The wire's definition in its tile type.
    pub fn wire_data(&self, wire: WireId) -> &WireData {
        &self.tile_type(wire.tile).wires[wire.index as usize]
    }

    /// The wire's type-level name.
    pub fn wire_name(&self, wire: WireId) -> &str {
        &self.wire_data(wire).name
    }

    /// The wire's intent category.
    pub fn wire_intent(&self, wire: WireId) -> WireIntent {
        self.wire_data(wire).intent
    }

    /// The PIP's definition in its tile type.
    pub fn pip_data(&self, pip: PipId) -> &PipData {
        &self.tile_type(pip.tile).pips[pip.index as usize]
    }

    /// The PIP's source wire.
    pub fn pip_src_wire(&self, pip: PipId) -> WireId {
        WireId::new(pip.tile, self.pip_data(pip).src_index)
    }

    /// The PIP's destination wire.
    pub fn pip_dst_wire(&self, pip: PipId) -> WireId {
        WireId::new(pip.tile, self.pip_data(pip).dst_index)
    }

    /// All PIPs in the wire's tile that drive onto it.
    pub fn pips_uphill(&self, wire: WireId) -> impl Iterator<Item = PipId> + '_ {
        self.tile_type(wire.tile)
            .pips
            .iter()
            .enumerate()
            .filter(move |(_, pd)| pd.dst_index == wire.index)
            .map(move |(i, _)| PipId::new(wire.tile, i as u32))
    }

    /// The BEL's definition in its tile type.
    pub fn bel_data(&self, bel: BelId) -> &BelData {
        &self.tile_type(bel.tile).bels[bel.index as usize]
    }

    /// The BEL's name within its site.
    pub fn bel_name(&self, bel: BelId) -> &str {
        &self.bel_data(bel).name
    }

    /// The wire a BEL pin connects to, if the pin exists.
    pub fn bel_pin_wire(&self, bel: BelId, pin: &str) -> Option<WireId> {
        self.bel_data(bel)
            .pins
            .iter()
            .find(|(p, _)| p == pin)
            .map(|(_, wi)| WireId::new(bel.tile, *wi))
    }

    /// A named wire in the same site as the BEL.
    pub fn site_wire(&self, bel: BelId, name: &str) -> Option<WireId> {
        let site = self.bel_data(bel).site;
        self.tile_type(bel.tile)
            .wires
            .iter()
            .enumerate()
            .find(|(_, wd)| wd.site == site && wd.name == name)
            .map(|(i, _)| WireId::new(bel.tile, i as u32))
    }

    /// The placed name of the BEL's site (e.g. `IOB_X0Y42`).
    pub fn bel_site_name(&self, bel: BelId) -> &str {
        let site = self.bel_data(bel).site;
        &self.tile(bel.tile).sites[site as usize].name
    }

    /// The BEL's site location within its tile.
    pub fn site_loc_in_tile(&self, bel: BelId) -> (i32, i32) {
        let site = self.bel_data(bel).site;
        let inst = &self.tile(bel.tile).sites[site as usize];
        (inst.x, inst.y)
    }

    /// Looks up a BEL by its `SITE/BEL` name.
    pub fn bel_by_name(&self, name: &str) -> Option<BelId> {
        self.bel_by_name.get(name).copied()
    }

    /// Any BEL in the given site slot of a tile, if the slot has one.
    pub fn first_bel_in_site(&self, tile: TileId, site: i32) -> Option<BelId> {
        self.tile_type(tile)
            .bels
            .iter()
            .position(|bd| bd.site == site)
            .map(|i| BelId::new(tile, i as u32))
    }

    /// Looks up a wire by its `TILE/WIRE` name.
    pub fn wire_by_name(&self, name: &str) -> Option<WireId> {
        self.wire_by_name.get(name).copied()
    }

    /// The HCLK tile serving an I/O interconnect tile's bank.
    ///
    /// # Panics
    ///
    /// Panics if the tile is not associated with an I/O bank.
    pub fn hclk_for_ioi(&self, tile: TileId) -> TileId {
        *self
            .io_hclk
            .get(&tile)
            .unwrap_or_else(|| panic!("tile {} has no bank HCLK", self.tile_name(tile)))
    }

    /// The HCLK tile serving an I/O buffer's bank.
    pub fn hclk_for_iob(&self, bel: BelId) -> TileId {
        self.hclk_for_ioi(bel.tile)
    }

    /// Whether the BEL sits in a logic (CLB) tile.
    pub fn is_logic_tile(&self, bel: BelId) -> bool {
        self.tile_type_name(bel.tile).contains("CLB")
    }

    /// Registers the bank HCLK of an I/O tile.
    pub fn set_io_hclk(&mut self, io_tile: TileId, hclk: TileId) {
        self.io_hclk.insert(io_tile, hclk);
    }
}
