//! Logic-tile (SLICE) emission: LUT initialisation, flip-flop
//! configuration, carry chains, and the routing muxes inside the slice.

use crate::{EmitError, Emitter};
use kiln_common::BitVec;
use kiln_design::{
    CellInfo, BEL_5LUT, BEL_6LUT, BEL_CARRY4, BEL_FF, BEL_FF2, GND_NET, VCC_NET,
};
use kiln_design::design::logic_slot;
use kiln_device::{TileId, WireId};
use std::collections::BTreeSet;
use std::io::Write;

/// Logical input pins of a LUT-type cell, in table-address bit order.
pub fn lut_logical_inputs(orig_type: &str) -> Option<&'static [&'static str]> {
    match orig_type {
        "LUT1" => Some(&["I0"]),
        "LUT2" => Some(&["I0", "I1"]),
        "LUT3" => Some(&["I0", "I1", "I2"]),
        "LUT4" => Some(&["I0", "I1", "I2", "I3"]),
        "LUT5" => Some(&["I0", "I1", "I2", "I3", "I4"]),
        "LUT6" => Some(&["I0", "I1", "I2", "I3", "I4", "I5"]),
        "RAMD64E" => Some(&["RADR0", "RADR1", "RADR2", "RADR3", "RADR4", "RADR5"]),
        "SRL16E" => Some(&["A0", "A1", "A2", "A3"]),
        "SRLC32E" => Some(&["A[0]", "A[1]", "A[2]", "A[3]", "A[4]"]),
        "RAMD32" => Some(&["RADR0", "RADR1", "RADR2", "RADR3", "RADR4"]),
        _ => None,
    }
}

/// Permutes a logical LUT truth table onto the physical 64-entry table.
///
/// `phys_to_log[k]` lists the logical address bits driven by physical
/// input `A<k+1>` (one physical pin may drive several logical pins of a
/// fractured LUT). For each physical address `j` in `lo..hi`, the logical
/// address is the OR of the logical bits of every asserted physical
/// input, and the output bit is the logical `INIT` at that address.
pub fn permute_lut_init(
    init: &BitVec,
    phys_to_log: &[Vec<usize>; 6],
    lo: usize,
    hi: usize,
    out: &mut BitVec,
) {
    for j in lo..hi {
        let mut log_index = 0usize;
        for (k, logs) in phys_to_log.iter().enumerate() {
            if j & (1 << k) == 0 {
                continue;
            }
            for &p in logs {
                log_index |= 1 << p;
            }
        }
        out.set(j as u32, init.get(log_index as u32));
    }
}

/// Computes the physical-pin to logical-bit mapping of a LUT-type cell
/// from its `X_ORIG_PORT_A1..A6` attributes.
fn lut_phys_to_log(lut: &CellInfo) -> Result<[Vec<usize>; 6], EmitError> {
    let orig_type = lut.orig_type();
    let inputs = lut_logical_inputs(&orig_type).ok_or_else(|| {
        EmitError::unsupported(&lut.name, format!("unsupported LUT-type cell '{orig_type}'"))
    })?;
    let mut phys_to_log: [Vec<usize>; 6] = Default::default();
    for (j, slot) in phys_to_log.iter_mut().enumerate() {
        let attr = format!("X_ORIG_PORT_A{}", j + 1);
        if let Some(orig) = lut.attrs.get(&attr).and_then(|v| v.as_str()) {
            for name in orig.split_whitespace() {
                if let Some(pos) = inputs.iter().position(|&p| p == name) {
                    slot.push(pos);
                }
            }
        }
    }
    Ok(phys_to_log)
}

/// The physical 64-bit INIT of an eighth-tile from its bound sub-LUTs.
///
/// With both sub-LUTs present the LUT is fractured: the 5-LUT writes only
/// the lower half of the table and the 6-LUT only the upper half.
fn get_lut_init(
    lut6: Option<&CellInfo>,
    lut5: Option<&CellInfo>,
) -> Result<BitVec, EmitError> {
    let mut bits = BitVec::new(64);
    let fractured = lut6.is_some() && lut5.is_some();
    for (is_lut5, lut) in [(false, lut6), (true, lut5)] {
        let Some(lut) = lut else { continue };
        let phys_to_log = lut_phys_to_log(lut)?;
        let (lo, hi) = if fractured {
            if is_lut5 {
                (0, 32)
            } else {
                (32, 64)
            }
        } else {
            (0, 64)
        };
        let init = lut.bits_param("INIT", 64);
        permute_lut_init(&init, &phys_to_log, lo, hi, &mut bits);
    }
    Ok(bits)
}

/// FASM site name of a half-tile.
fn half_name(half: usize, is_m: bool) -> &'static str {
    match (half, is_m) {
        (0, true) => "SLICEM_X0",
        (0, false) => "SLICEL_X0",
        _ => "SLICEL_X1",
    }
}

impl<W: Write> Emitter<'_, W> {
    /// Emits configuration for every tile hosting at least one logic cell.
    pub(crate) fn write_logic(&mut self) -> Result<(), EmitError> {
        let design = self.design;
        let dev = self.dev;
        let mut used_logic_tiles = BTreeSet::new();
        for cell in design.cells.values() {
            if dev.is_logic_tile(cell.bel) {
                used_logic_tiles.insert(cell.bel.tile);
            }
        }
        for tile in used_logic_tiles {
            self.write_luts_config(tile, 0)?;
            self.write_luts_config(tile, 1)?;
            self.write_ffs_config(tile, 0)?;
            self.write_ffs_config(tile, 1)?;
            self.write_carry_config(tile, 0)?;
            self.write_carry_config(tile, 1)?;
            self.out.blank()?;
        }
        Ok(())
    }

    /// Emits the site-PIP setting of a routing BEL driving `dst_wire`.
    pub(crate) fn write_routing_bel(&mut self, dst_wire: WireId) -> Result<(), EmitError> {
        let dev = self.dev;
        let design = self.design;
        let uphill: Vec<_> = dev.pips_uphill(dst_wire).collect();
        for pip in uphill {
            if design.pip_net(pip).is_none() {
                continue;
            }
            let pd = dev.pip_data(pip);
            let Some(bel) = pd.bel.as_deref() else { continue };
            let pin = pd.bel_pin.as_deref().unwrap_or("");
            let mut bel_name = bel;
            let mut skip_pin = false;

            // Modes with no associated configuration bit.
            if bel == "WEMUX" && pin == "WE" {
                continue;
            }
            if bel.len() > 1 && &bel[1..] == "DI1MUX" {
                bel_name = "DI1MUX";
            }
            if bel.len() > 1 && &bel[1..] == "CY0" {
                if pin.len() > 1 && &pin[1..] == "5" {
                    skip_pin = true;
                } else {
                    continue;
                }
            }

            if skip_pin {
                self.out.write_bit(bel_name, true)?;
            } else {
                self.out.write_bit(&format!("{bel_name}.{pin}"), true)?;
            }
        }
        Ok(())
    }

    /// Convenience for routing-bel scans on wires that may not exist.
    fn write_routing_bel_opt(&mut self, wire: Option<WireId>) -> Result<(), EmitError> {
        if let Some(wire) = wire {
            self.write_routing_bel(wire)?;
        }
        Ok(())
    }

    fn write_luts_config(&mut self, tile: TileId, half: usize) -> Result<(), EmitError> {
        let design = self.design;
        let dev = self.dev;
        let Some(lts) = design.logic_tile(tile) else {
            return Ok(());
        };
        let tname = dev.tile_name(tile);
        let is_mtile = tname.contains("CLBLM");
        let is_slicem = is_mtile && half == 0;

        self.out.push(tname);
        self.out.push(half_name(half, is_mtile));

        let site_bel = dev.first_bel_in_site(tile, half as i32);
        let mut wa7_used = false;
        let mut wa8_used = false;

        for (i, letter) in ['A', 'B', 'C', 'D'].into_iter().enumerate() {
            let lut6 = lts
                .get(logic_slot(half, i, BEL_6LUT))
                .and_then(|n| design.cell(n));
            let lut5 = lts
                .get(logic_slot(half, i, BEL_5LUT))
                .and_then(|n| design.cell(n));

            if lut6.is_some() || lut5.is_some() {
                self.out.push(format!("{letter}LUT"));
                self.out
                    .write_vector("INIT[63:0]", &get_lut_init(lut6, lut5)?, false)?;

                let mut is_small = false;
                let mut is_ram = false;
                let mut is_srl = false;
                for lut in [lut6, lut5].into_iter().flatten() {
                    match lut.orig_type().as_str() {
                        "RAMD64E" | "RAMS64E" => is_ram = true,
                        "RAMD32" | "RAMS32" => {
                            is_ram = true;
                            is_small = true;
                        }
                        "SRL16E" => {
                            is_srl = true;
                            is_small = true;
                        }
                        "SRLC32E" => is_srl = true,
                        _ => {}
                    }
                    wa7_used |= lut.port_net_name("WA7").is_some();
                    wa8_used |= lut.port_net_name("WA8").is_some();
                }
                if is_slicem && i != 3 {
                    let wire =
                        site_bel.and_then(|b| dev.site_wire(b, &format!("{letter}DI1MUX_OUT")));
                    self.write_routing_bel_opt(wire)?;
                }
                self.out.write_bit("SMALL", is_small)?;
                self.out.write_bit("RAM", is_ram)?;
                self.out.write_bit("SRL", is_srl)?;
                self.out.pop();
            }
            let wire = site_bel.and_then(|b| dev.site_wire(b, &format!("{letter}MUX")));
            self.write_routing_bel_opt(wire)?;
        }
        self.out.write_bit("WA7USED", wa7_used)?;
        self.out.write_bit("WA8USED", wa8_used)?;
        if is_slicem {
            let wire = site_bel.and_then(|b| dev.site_wire(b, "WEMUX_OUT"));
            self.write_routing_bel_opt(wire)?;
        }

        self.out.pop_n(2);
        Ok(())
    }

    fn write_ffs_config(&mut self, tile: TileId, half: usize) -> Result<(), EmitError> {
        let design = self.design;
        let dev = self.dev;
        let Some(lts) = design.logic_tile(tile) else {
            return Ok(());
        };
        let tname = dev.tile_name(tile);

        let mut found_ff = false;
        let mut negedge_ff = false;
        let mut is_latch = false;
        let mut is_sync = false;
        let mut is_clkinv = false;
        let mut is_srused = false;
        let mut is_ceused = false;

        // All flip-flops in a half share the control set; the first one
        // seen sets each flag, the rest must agree.
        macro_rules! set_check {
            ($dst:ident, $src:expr) => {
                if found_ff {
                    assert_eq!($dst, $src, "flip-flop control-set mismatch in {tname}");
                } else {
                    $dst = $src;
                }
            };
        }

        self.out.push(tname);
        self.out.push(half_name(half, tname.contains("CLBLM")));

        for i in 0..4 {
            let ff1 = lts
                .get(logic_slot(half, i, BEL_FF))
                .and_then(|n| design.cell(n));
            let ff2 = lts
                .get(logic_slot(half, i, BEL_FF2))
                .and_then(|n| design.cell(n));
            for ff in [ff1, ff2].into_iter().flatten() {
                self.out.push(dev.bel_name(ff.bel));

                let zinit = ff.int_param("INIT", 0) != 1;
                let ff_type = ff.orig_type();
                let (zrst, negedge, sync) = match ff_type.as_str() {
                    "FDRE" => (true, false, true),
                    "FDRE_1" => (true, true, true),
                    "FDSE" => (false, false, true),
                    "FDSE_1" => (false, true, true),
                    "FDCE" => (true, false, false),
                    "FDCE_1" => (true, true, false),
                    "FDPE" => (false, false, false),
                    "FDPE_1" => (false, true, false),
                    _ => {
                        return Err(EmitError::unsupported(
                            &ff.name,
                            format!("unsupported FF type '{ff_type}'"),
                        ))
                    }
                };
                set_check!(negedge_ff, negedge);
                set_check!(is_latch, false);
                set_check!(is_sync, sync);

                self.out.write_bit("ZINI", zinit)?;
                self.out.write_bit("ZRST", zrst)?;
                self.out.pop();

                if negedge_ff {
                    set_check!(is_clkinv, true);
                } else {
                    set_check!(is_clkinv, ff.int_param("IS_CLK_INVERTED", 0) == 1);
                }

                let sr = design.port_net(ff, "SR");
                let ce = design.port_net(ff, "CE");
                set_check!(is_srused, sr.map(|n| n.name != GND_NET).unwrap_or(false));
                set_check!(is_ceused, ce.map(|n| n.name != VCC_NET).unwrap_or(false));

                // Input mux.
                self.write_routing_bel_opt(dev.bel_pin_wire(ff.bel, "D"))?;

                found_ff = true;
            }
        }
        self.out.write_bit("LATCH", is_latch)?;
        self.out.write_bit("FFSYNC", is_sync)?;
        self.out.write_bit("CLKINV", is_clkinv)?;
        self.out.write_bit("NOCLKINV", !is_clkinv)?;
        self.out.write_bit("SRUSEDMUX", is_srused)?;
        self.out.write_bit("CEUSEDMUX", is_ceused)?;
        self.out.pop_n(2);
        Ok(())
    }

    fn write_carry_config(&mut self, tile: TileId, half: usize) -> Result<(), EmitError> {
        let design = self.design;
        let dev = self.dev;
        let Some(lts) = design.logic_tile(tile) else {
            return Ok(());
        };
        let Some(carry) = lts
            .get(logic_slot(half, 0, BEL_CARRY4))
            .and_then(|n| design.cell(n))
        else {
            return Ok(());
        };
        let tname = dev.tile_name(tile);

        self.out.push(tname);
        self.out.push(half_name(half, tname.contains("CLBLM")));

        self.write_routing_bel_opt(dev.site_wire(carry.bel, "PRECYINIT_OUT"))?;
        if design.port_net(carry, "CIN").is_some() {
            self.out.write_bit("PRECYINIT.CIN", true)?;
        }
        self.out.push("CARRY4");
        for letter in ['A', 'B', 'C', 'D'] {
            self.write_routing_bel_opt(dev.site_wire(carry.bel, &format!("{letter}CY0_OUT")))?;
        }
        self.out.pop_n(3);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_inputs_by_type() {
        assert_eq!(lut_logical_inputs("LUT1"), Some(&["I0"][..]));
        assert_eq!(lut_logical_inputs("LUT6").unwrap().len(), 6);
        assert_eq!(lut_logical_inputs("RAMD64E").unwrap().len(), 6);
        assert_eq!(lut_logical_inputs("SRL16E").unwrap().len(), 4);
        assert_eq!(lut_logical_inputs("SRLC32E").unwrap()[0], "A[0]");
        assert_eq!(lut_logical_inputs("RAMD32").unwrap().len(), 5);
        assert!(lut_logical_inputs("FDRE").is_none());
    }

    fn empty_map() -> [Vec<usize>; 6] {
        Default::default()
    }

    #[test]
    fn permute_identity_mapping() {
        // Each physical pin drives the same-numbered logical pin: the
        // physical table equals the logical table.
        let mut map = empty_map();
        for (k, slot) in map.iter_mut().enumerate() {
            slot.push(k);
        }
        let init = BitVec::from_u64(0x8000_0000_0000_0001, 64);
        let mut out = BitVec::new(64);
        permute_lut_init(&init, &map, 0, 64, &mut out);
        assert_eq!(out.to_u64(), Some(0x8000_0000_0000_0001));
    }

    #[test]
    fn permute_swapped_pins() {
        // LUT2 with I0 on A2 and I1 on A1: physical address bit 1 selects
        // logical bit 0.
        let mut map = empty_map();
        map[0].push(1);
        map[1].push(0);
        // Logical AND: only address 3 is set.
        let init = BitVec::from_u64(0b1000, 64);
        let mut out = BitVec::new(64);
        permute_lut_init(&init, &map, 0, 64, &mut out);
        // Physical address needs both bit 0 and bit 1.
        assert!(out.get(3));
        assert!(!out.get(1));
        assert!(!out.get(2));
    }

    #[test]
    fn permute_shared_physical_pin() {
        // One physical pin driving both logical pins of a LUT2: the
        // physical table depends on that single pin.
        let mut map = empty_map();
        map[3] = vec![0, 1];
        let init = BitVec::from_u64(0b1000, 64);
        let mut out = BitVec::new(64);
        permute_lut_init(&init, &map, 0, 64, &mut out);
        for j in 0..64u32 {
            assert_eq!(out.get(j), j & 8 != 0, "bit {j}");
        }
    }

    #[test]
    fn permute_respects_half_bounds() {
        let mut map = empty_map();
        map[0].push(0);
        let init = BitVec::all_ones(64);
        let mut out = BitVec::new(64);
        permute_lut_init(&init, &map, 32, 64, &mut out);
        assert!(!out.get(0));
        assert!(out.get(33));
    }

    #[test]
    fn permute_unconnected_pins_index_zero() {
        // No physical pins mapped: every entry reads logical address 0.
        let map = empty_map();
        let init = BitVec::from_u64(1, 64);
        let mut out = BitVec::new(64);
        permute_lut_init(&init, &map, 0, 64, &mut out);
        assert!((0..64).all(|j| out.get(j)));
    }

    #[test]
    fn half_names() {
        assert_eq!(half_name(0, false), "SLICEL_X0");
        assert_eq!(half_name(0, true), "SLICEM_X0");
        assert_eq!(half_name(1, false), "SLICEL_X1");
        assert_eq!(half_name(1, true), "SLICEL_X1");
    }
}
