//! Clock network emission: global buffers, clock management blocks, and
//! the row/bank-level enables derived from routing use.
//!
//! Three passes: cells first (BUFGCTRL, PLL, MMCM), then per-tile buffer
//! enables keyed on the wires the routing pass recorded, then the re-buffer
//! and CMT re-pass over the accumulated global-clock and bank-HCLK sets.

use crate::{EmitError, Emitter};
use kiln_device::TileId;
use std::collections::{BTreeSet, HashMap};
use std::io::Write;

impl<W: Write> Emitter<'_, W> {
    pub(crate) fn write_clocking(&mut self) -> Result<(), EmitError> {
        let design = self.design;
        let dev = self.dev;

        let mut all_gclk: BTreeSet<String> = BTreeSet::new();
        let mut hclk_by_row: HashMap<u32, BTreeSet<String>> = HashMap::new();

        for cell in design.cells.values() {
            match cell.kind.as_str() {
                "BUFGCTRL" => {
                    self.out.push(dev.tile_name(cell.bel.tile));
                    let (x, y) = dev.site_loc_in_tile(cell.bel);
                    self.out.push(format!("BUFGCTRL.BUFGCTRL_X{x}Y{y}"));
                    self.out.write_bit("IN_USE", true)?;
                    self.out
                        .write_bit("INIT_OUT", cell.bool_param("INIT_OUT", false))?;
                    self.out.write_bit(
                        "IS_IGNORE0_INVERTED",
                        cell.bool_param("IS_IGNORE0_INVERTED", false),
                    )?;
                    self.out.write_bit(
                        "IS_IGNORE1_INVERTED",
                        cell.bool_param("IS_IGNORE1_INVERTED", false),
                    )?;
                    self.out
                        .write_bit("ZINV_CE0", !cell.bool_param("IS_CE0_INVERTED", false))?;
                    self.out
                        .write_bit("ZINV_CE1", !cell.bool_param("IS_CE1_INVERTED", false))?;
                    self.out
                        .write_bit("ZINV_S0", !cell.bool_param("IS_S0_INVERTED", false))?;
                    self.out
                        .write_bit("ZINV_S1", !cell.bool_param("IS_S1_INVERTED", false))?;
                    self.out.pop_n(2);
                }
                "PLLE2_ADV_PLLE2_ADV" => self.write_pll(cell)?,
                "MMCME2_ADV_MMCME2_ADV" => self.write_mmcm(cell)?,
                _ => {}
            }
            self.out.blank()?;
        }

        let tiles: Vec<(TileId, String, String)> = dev
            .tiles_and_types()
            .map(|(t, name, ty)| (t, name.to_string(), ty.to_string()))
            .collect();

        for (tile, name, ty) in &tiles {
            self.out.push(name.clone());
            if matches!(
                ty.as_str(),
                "HCLK_L" | "HCLK_R" | "HCLK_L_BOT_UTURN" | "HCLK_R_BOT_UTURN"
            ) {
                let used_sources = self.used_wires_starting_with(*tile, "HCLK_CK_", true);
                self.out.push("ENABLE_BUFFER");
                for source in used_sources {
                    if let Some(pos) = source.find("BUFHCLK") {
                        self.out.write_bit(&source, true)?;
                        hclk_by_row
                            .entry(self.dev.tile_row(*tile))
                            .or_default()
                            .insert(source[pos..].to_string());
                    }
                }
                self.out.pop();
            } else if ty.starts_with("CLK_HROW") {
                let used_gclk = self.used_wires_starting_with(*tile, "CLK_HROW_R_CK_GCLK", true);
                let used_ck_in = self.used_wires_starting_with(*tile, "CLK_HROW_CK_IN", true);
                for wire in used_gclk {
                    self.out.write_bit(&format!("{wire}_ACTIVE"), true)?;
                    if let Some(pos) = wire.find("GCLK") {
                        all_gclk.insert(wire[pos..].to_string());
                    }
                }
                for wire in used_ck_in {
                    if wire.contains("HROW_CK_INT") {
                        continue;
                    }
                    self.out.write_bit(&format!("{wire}_ACTIVE"), true)?;
                }
            } else if ty.starts_with("HCLK_CMT") {
                let used_ccio = self.used_wires_starting_with(*tile, "HCLK_CMT_CCIO", true);
                for wire in used_ccio {
                    self.out.write_bit(&format!("{wire}_ACTIVE"), true)?;
                    self.out.write_bit(&format!("{wire}_USED"), true)?;
                }
                let used_hclk = self.used_wires_starting_with(*tile, "HCLK_CMT_CK_", true);
                for wire in used_hclk {
                    if let Some(pos) = wire.find("BUFHCLK") {
                        self.out.write_bit(&format!("{wire}_USED"), true)?;
                        hclk_by_row
                            .entry(self.dev.tile_row(*tile))
                            .or_default()
                            .insert(wire[pos..].to_string());
                    }
                }
            }
            self.out.pop();
            self.out.blank()?;
        }

        for (tile, name, ty) in &tiles {
            self.out.push(name.clone());
            if ty == "CLK_BUFG_REBUF" {
                for gclk in &all_gclk {
                    self.out.write_bit(&format!("{gclk}_ENABLE_ABOVE"), true)?;
                    self.out.write_bit(&format!("{gclk}_ENABLE_BELOW"), true)?;
                }
            } else if ty.starts_with("HCLK_CMT") {
                if let Some(row_hclks) = hclk_by_row.get(&self.dev.tile_row(*tile)) {
                    for hclk in row_hclks {
                        self.out
                            .write_bit(&format!("HCLK_CMT_CK_{hclk}_USED"), true)?;
                    }
                }
            }
            self.out.pop();
            self.out.blank()?;
        }
        Ok(())
    }
}
