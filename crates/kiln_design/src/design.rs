//! Cells, nets, and per-tile packer state of a bound design.

use crate::param::ParamValue;
use kiln_common::BitVec;
use kiln_device::{BelId, PipId, TileId, WireId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Name of the packer's constant-zero net.
pub const GND_NET: &str = "$PACKER_GND_NET";
/// Name of the packer's constant-one net.
pub const VCC_NET: &str = "$PACKER_VCC_NET";

/// Sub-slot of the 6-input LUT in an eighth-tile.
pub const BEL_6LUT: usize = 0;
/// Sub-slot of the 5-input LUT in an eighth-tile.
pub const BEL_5LUT: usize = 1;
/// Sub-slot of the primary flip-flop in an eighth-tile.
pub const BEL_FF: usize = 2;
/// Sub-slot of the secondary flip-flop in an eighth-tile.
pub const BEL_FF2: usize = 3;
/// Per-half carry chain slot (stored in letter A's spare sub-slot).
pub const BEL_CARRY4: usize = 15;

/// Slot of a RAMB36E1 occupying the whole BRAM tile.
pub const BEL_RAM36: usize = 0;
/// Slot of the lower RAMB18E1 half.
pub const BEL_RAM18_L: usize = 1;
/// Slot of the upper RAMB18E1 half.
pub const BEL_RAM18_U: usize = 2;

/// A placed cell in the bound design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellInfo {
    /// Cell instance name.
    pub name: String,
    /// Placed cell kind (e.g. `PAD`, `ILOGICE3_IFF`, `DSP48E1_DSP48E1`).
    pub kind: String,
    /// The BEL this cell is bound to.
    pub bel: BelId,
    /// Keyed parameter map.
    pub params: BTreeMap<String, ParamValue>,
    /// Keyed attribute map (e.g. `X_ORIG_TYPE`, `IOSTANDARD`).
    pub attrs: BTreeMap<String, ParamValue>,
    /// Port name to connected net name.
    pub ports: BTreeMap<String, Option<String>>,
}

impl CellInfo {
    /// Creates a cell bound to the given BEL with empty maps.
    pub fn new(name: impl Into<String>, kind: impl Into<String>, bel: BelId) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            bel,
            params: BTreeMap::new(),
            attrs: BTreeMap::new(),
            ports: BTreeMap::new(),
        }
    }

    /// String parameter, or `default` when absent or not a string.
    pub fn str_param(&self, name: &str, default: &str) -> String {
        self.params
            .get(name)
            .and_then(|v| v.as_str())
            .unwrap_or(default)
            .to_string()
    }

    /// Integer parameter, or `default` when absent.
    pub fn int_param(&self, name: &str, default: i64) -> i64 {
        self.params
            .get(name)
            .and_then(|v| v.as_int())
            .unwrap_or(default)
    }

    /// Boolean parameter, or `default` when absent.
    pub fn bool_param(&self, name: &str, default: bool) -> bool {
        self.params.get(name).map(|v| v.as_bool()).unwrap_or(default)
    }

    /// Real-valued parameter, or `default` when absent.
    pub fn f64_param(&self, name: &str, default: f64) -> f64 {
        self.params
            .get(name)
            .and_then(|v| v.as_f64())
            .unwrap_or(default)
    }

    /// Parameter as a bit vector of `width` bits (all zeros when absent).
    pub fn bits_param(&self, name: &str, width: u32) -> BitVec {
        self.params
            .get(name)
            .map(|v| v.as_bits(width))
            .unwrap_or_else(|| BitVec::new(width))
    }

    /// Whether the parameter is present.
    pub fn has_param(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// String attribute, or `default` when absent or not a string.
    pub fn str_attr(&self, name: &str, default: &str) -> String {
        self.attrs
            .get(name)
            .and_then(|v| v.as_str())
            .unwrap_or(default)
            .to_string()
    }

    /// Integer attribute, or `default` when absent.
    pub fn int_attr(&self, name: &str, default: i64) -> i64 {
        self.attrs
            .get(name)
            .and_then(|v| v.as_int())
            .unwrap_or(default)
    }

    /// Whether the attribute is present.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// The cell's original (pre-packing) type from `X_ORIG_TYPE`.
    pub fn orig_type(&self) -> String {
        self.str_attr("X_ORIG_TYPE", "")
    }

    /// Name of the net connected to a port, if any.
    pub fn port_net_name(&self, port: &str) -> Option<&str> {
        self.ports.get(port).and_then(|n| n.as_deref())
    }
}

/// One endpoint of a net: a cell's port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRef {
    /// The cell name.
    pub cell: String,
    /// The port name on that cell.
    pub port: String,
}

impl PortRef {
    /// Creates a port reference.
    pub fn new(cell: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            cell: cell.into(),
            port: port.into(),
        }
    }
}

/// A net in the bound design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetInfo {
    /// Net name.
    pub name: String,
    /// The driving port, if the net has an on-fabric driver.
    pub driver: Option<PortRef>,
    /// Sink ports.
    pub users: Vec<PortRef>,
    /// Wires used by this net's routing, each annotated with the PIP
    /// that drove onto it (`None` for the source wire).
    pub wires: BTreeMap<WireId, Option<PipId>>,
}

impl NetInfo {
    /// Creates an unrouted net with no connections.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            driver: None,
            users: Vec::new(),
            wires: BTreeMap::new(),
        }
    }

    /// Whether this is one of the packer's constant nets.
    pub fn is_constant(&self) -> bool {
        self.name == GND_NET || self.name == VCC_NET
    }
}

/// Cells packed into the sub-slots of one logic tile.
///
/// Slots are keyed by `(half << 6) | (letter << 4) | subslot` with the
/// `BEL_*` sub-slot constants; the carry chain occupies `BEL_CARRY4`
/// within letter A of its half.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogicTileCells {
    slots: Vec<Option<String>>,
}

impl Default for LogicTileCells {
    fn default() -> Self {
        Self {
            slots: vec![None; 128],
        }
    }
}

impl LogicTileCells {
    /// The cell in the given slot, if any.
    pub fn get(&self, slot: usize) -> Option<&str> {
        self.slots[slot].as_deref()
    }

    /// Places a cell in the given slot.
    pub fn set(&mut self, slot: usize, cell: impl Into<String>) {
        self.slots[slot] = Some(cell.into());
    }
}

/// Packed slot index for a logic tile sub-BEL.
pub fn logic_slot(half: usize, letter: usize, sub: usize) -> usize {
    (half << 6) | (letter << 4) | sub
}

/// Cells packed into the sub-slots of one BRAM tile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BramTileCells {
    slots: Vec<Option<String>>,
}

impl Default for BramTileCells {
    fn default() -> Self {
        Self {
            slots: vec![None; 3],
        }
    }
}

impl BramTileCells {
    /// The cell in the given slot, if any.
    pub fn get(&self, slot: usize) -> Option<&str> {
        self.slots[slot].as_deref()
    }

    /// Places a cell in the given slot.
    pub fn set(&mut self, slot: usize, cell: impl Into<String>) {
        self.slots[slot] = Some(cell.into());
    }
}

/// A fully placed-and-routed design.
///
/// Cells and nets are keyed by name in sorted maps; the auxiliary
/// wire/PIP/BEL binding indices are rebuilt on deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Design {
    /// All cells, keyed by name.
    pub cells: BTreeMap<String, CellInfo>,
    /// All nets, keyed by name.
    pub nets: BTreeMap<String, NetInfo>,
    /// Logic-tile packer state.
    pub logic_tiles: HashMap<TileId, LogicTileCells>,
    /// BRAM-tile packer state.
    pub bram_tiles: HashMap<TileId, BramTileCells>,
    /// Auxiliary index: wire to occupying net (rebuilt on deserialization).
    #[serde(skip)]
    wire_to_net: HashMap<WireId, String>,
    /// Auxiliary index: PIP to occupying net (rebuilt on deserialization).
    #[serde(skip)]
    pip_to_net: HashMap<PipId, String>,
    /// Auxiliary index: BEL to bound cell (rebuilt on deserialization).
    #[serde(skip)]
    bel_to_cell: HashMap<BelId, String>,
}

impl Design {
    /// Creates an empty design.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cell, indexing its BEL binding.
    pub fn add_cell(&mut self, cell: CellInfo) {
        self.bel_to_cell.insert(cell.bel, cell.name.clone());
        self.cells.insert(cell.name.clone(), cell);
    }

    /// Adds a net, indexing its wire and PIP occupancy.
    pub fn add_net(&mut self, net: NetInfo) {
        for (&wire, &pip) in &net.wires {
            self.wire_to_net.insert(wire, net.name.clone());
            if let Some(pip) = pip {
                self.pip_to_net.insert(pip, net.name.clone());
            }
        }
        self.nets.insert(net.name.clone(), net);
    }

    /// Rebuilds the auxiliary indices after deserialization.
    pub fn rebuild_indices(&mut self) {
        self.wire_to_net.clear();
        self.pip_to_net.clear();
        self.bel_to_cell.clear();
        for cell in self.cells.values() {
            self.bel_to_cell.insert(cell.bel, cell.name.clone());
        }
        for net in self.nets.values() {
            for (&wire, &pip) in &net.wires {
                self.wire_to_net.insert(wire, net.name.clone());
                if let Some(pip) = pip {
                    self.pip_to_net.insert(pip, net.name.clone());
                }
            }
        }
    }

    /// The cell with the given name.
    pub fn cell(&self, name: &str) -> Option<&CellInfo> {
        self.cells.get(name)
    }

    /// The net with the given name.
    pub fn net(&self, name: &str) -> Option<&NetInfo> {
        self.nets.get(name)
    }

    /// The net connected to a cell's port, if any.
    pub fn port_net(&self, cell: &CellInfo, port: &str) -> Option<&NetInfo> {
        cell.port_net_name(port).and_then(|n| self.nets.get(n))
    }

    /// The net occupying a wire, if any.
    pub fn wire_net(&self, wire: WireId) -> Option<&NetInfo> {
        self.wire_to_net.get(&wire).and_then(|n| self.nets.get(n))
    }

    /// The net routed through a PIP, if any.
    pub fn pip_net(&self, pip: PipId) -> Option<&NetInfo> {
        self.pip_to_net.get(&pip).and_then(|n| self.nets.get(n))
    }

    /// The cell bound to a BEL, if any.
    pub fn cell_bound_to(&self, bel: BelId) -> Option<&CellInfo> {
        self.bel_to_cell.get(&bel).and_then(|n| self.cells.get(n))
    }

    /// The logic-tile packer state for a tile, if the tile hosts logic.
    pub fn logic_tile(&self, tile: TileId) -> Option<&LogicTileCells> {
        self.logic_tiles.get(&tile)
    }

    /// Places a cell into a logic-tile slot.
    pub fn set_logic_cell(&mut self, tile: TileId, slot: usize, cell: impl Into<String>) {
        self.logic_tiles.entry(tile).or_default().set(slot, cell);
    }

    /// The BRAM-tile packer state for a tile, if the tile hosts BRAM.
    pub fn bram_tile(&self, tile: TileId) -> Option<&BramTileCells> {
        self.bram_tiles.get(&tile)
    }

    /// Places a cell into a BRAM-tile slot.
    pub fn set_bram_cell(&mut self, tile: TileId, slot: usize, cell: impl Into<String>) {
        self.bram_tiles.entry(tile).or_default().set(slot, cell);
    }
}
