//! Block RAM emission: width modes, initialisation contents, and address
//! cascade activity.

use crate::{EmitError, Emitter};
use kiln_common::BitVec;
use kiln_design::{invertible_pins, CellInfo, BEL_RAM18_L, BEL_RAM18_U, BEL_RAM36};
use kiln_device::TileId;
use std::io::Write;

impl<W: Write> Emitter<'_, W> {
    /// Emits both halves of every BRAM tile.
    pub(crate) fn write_bram(&mut self) -> Result<(), EmitError> {
        let dev = self.dev;
        let design = self.design;
        let bram_tiles: Vec<TileId> = dev
            .tiles_and_types()
            .filter(|(_, _, ty)| *ty == "BRAM_L" || *ty == "BRAM_R")
            .map(|(tile, _, _)| tile)
            .collect();

        for tile in bram_tiles {
            let (lower, upper) = match design.bram_tile(tile) {
                Some(bts) => {
                    if let Some(ram36) = bts.get(BEL_RAM36) {
                        // A RAMB36E1 occupies both halves.
                        (design.cell(ram36), design.cell(ram36))
                    } else {
                        (
                            bts.get(BEL_RAM18_L).and_then(|n| design.cell(n)),
                            bts.get(BEL_RAM18_U).and_then(|n| design.cell(n)),
                        )
                    }
                }
                None => (None, None),
            };
            self.write_bram_half(tile, 0, lower)?;
            self.write_bram_half(tile, 1, upper)?;
            self.out.blank()?;
        }
        Ok(())
    }

    fn write_bram_half(
        &mut self,
        tile: TileId,
        half: usize,
        ci: Option<&CellInfo>,
    ) -> Result<(), EmitError> {
        self.out.push(self.dev.tile_name(tile));
        self.out.push(format!("RAMB18_Y{half}"));
        if let Some(ci) = ci {
            let is_36 = ci.kind == "RAMB36E1_RAMB36E1";
            self.out.write_bit("IN_USE", true)?;
            self.write_bram_width(ci, "READ_WIDTH_A", is_36, half == 1)?;
            self.write_bram_width(ci, "READ_WIDTH_B", is_36, half == 1)?;
            self.write_bram_width(ci, "WRITE_WIDTH_A", is_36, half == 1)?;
            self.write_bram_width(ci, "WRITE_WIDTH_B", is_36, half == 1)?;
            self.out
                .write_bit("DOA_REG", ci.bool_param("DOA_REG", false))?;
            self.out
                .write_bit("DOB_REG", ci.bool_param("DOB_REG", false))?;
            for pin in invertible_pins(&ci.orig_type()) {
                self.out.write_bit(
                    &format!("ZINV_{pin}"),
                    !ci.bool_param(&format!("IS_{pin}_INVERTED"), false),
                )?;
            }
            for wrmode in ["WRITE_MODE_A", "WRITE_MODE_B"] {
                let mode = ci.str_param(wrmode, "WRITE_FIRST");
                if mode != "WRITE_FIRST" {
                    self.out.write_bit(&format!("{wrmode}_{mode}"), true)?;
                }
            }
            self.out
                .write_vector("ZINIT_A[17:0]", &BitVec::all_ones(18), false)?;
            self.out
                .write_vector("ZINIT_B[17:0]", &BitVec::all_ones(18), false)?;
            self.out
                .write_vector("ZSRVAL_A[17:0]", &BitVec::all_ones(18), false)?;
            self.out
                .write_vector("ZSRVAL_B[17:0]", &BitVec::all_ones(18), false)?;

            self.write_bram_init(half, ci, is_36)?;
        }
        self.out.pop();
        if half == 0 {
            let rd_casc = self.used_wires_starting_with(tile, "BRAM_CASCOUT_ADDRARDADDR", false);
            let wr_casc = self.used_wires_starting_with(tile, "BRAM_CASCOUT_ADDRBWRADDR", false);
            self.out
                .write_bit("CASCOUT_ARD_ACTIVE", !rd_casc.is_empty())?;
            self.out
                .write_bit("CASCOUT_BWR_ACTIVE", !wr_casc.is_empty())?;
        }
        self.out.pop();
        Ok(())
    }

    /// Emits the width features for one data port.
    ///
    /// Parameter widths of 36k instances are halved per 18k half; width 36
    /// selects the simple-dual-port shape with its companion bits.
    fn write_bram_width(
        &mut self,
        ci: &CellInfo,
        name: &str,
        is_36: bool,
        is_y1: bool,
    ) -> Result<(), EmitError> {
        let width = ci.int_param(name, 0);
        if width == 0 {
            return Ok(());
        }
        let actual_width = if is_36 {
            if width == 1 {
                1
            } else {
                width / 2
            }
        } else {
            width
        };
        if ((is_36 && width == 72) || (is_y1 && actual_width == 36)) && name == "READ_WIDTH_A" {
            self.out.write_bit(&format!("{name}_18"), true)?;
        }
        if actual_width == 36 {
            let port = &name[..name.len() - 2];
            self.out.write_bit(&format!("SDP_{port}_36"), true)?;
            let stem = &name[..name.len() - 1];
            if name.starts_with("WRITE") {
                self.out.write_bit(&format!("{stem}A_18"), true)?;
                self.out.write_bit(&format!("{stem}B_18"), true)?;
            } else if name.starts_with("READ") {
                self.out.write_bit(&format!("{stem}B_18"), true)?;
            }
        } else {
            self.out
                .write_bit(&format!("{name}_{actual_width}"), true)?;
        }
        Ok(())
    }

    /// Emits the data (`INIT_xx`) and parity (`INITP_xx`) contents.
    ///
    /// A 36k instance interleaves each output row from two source rows:
    /// the half index selects the even or odd source bits.
    fn write_bram_init(
        &mut self,
        half: usize,
        ci: &CellInfo,
        is_36: bool,
    ) -> Result<(), EmitError> {
        for mode in ["", "P"] {
            let rows = if mode == "P" { 8 } else { 64 };
            for i in 0..rows {
                let mut has_init = false;
                let mut init_data = BitVec::new(256);
                if is_36 {
                    for j in 0..2u32 {
                        let param = format!("INIT{mode}_{:02X}", i * 2 + j);
                        if ci.has_param(&param) {
                            has_init = true;
                            let bits = ci.bits_param(&param, 256);
                            let mut k = half as u32;
                            while k < 256 {
                                init_data.set(j * 128 + k / 2, bits.get(k));
                                k += 2;
                            }
                        }
                    }
                } else {
                    let param = format!("INIT{mode}_{i:02X}");
                    if ci.has_param(&param) {
                        has_init = true;
                        init_data = ci.bits_param(&param, 256);
                    }
                }
                if has_init {
                    self.out
                        .write_vector(&format!("INIT{mode}_{i:02X}[255:0]"), &init_data, false)?;
                }
            }
        }
        Ok(())
    }
}
