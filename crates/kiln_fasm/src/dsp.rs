//! DSP48E1 emission: operand registers, pattern detector, SIMD mode,
//! per-bit control inversions, and constant-tied pins.

use crate::{EmitError, Emitter};
use kiln_common::BitVec;
use kiln_design::CellInfo;
use std::io::Write;

/// Fills `width` bits from a binary parameter string, rightmost character
/// first; unset positions stay at the default-one level.
fn const_vector(text: &str, width: u32) -> BitVec {
    let mut bits = BitVec::all_ones(width);
    for (i, c) in text.chars().rev().take(width as usize).enumerate() {
        bits.set(i as u32, c == '1');
    }
    bits
}

impl<W: Write> Emitter<'_, W> {
    /// Emits every DSP48E1 cell.
    pub(crate) fn write_ip(&mut self) -> Result<(), EmitError> {
        let design = self.design;
        for cell in design.cells.values() {
            if cell.kind == "DSP48E1_DSP48E1" {
                self.write_dsp_cell(cell)?;
                self.out.blank()?;
            }
        }
        Ok(())
    }

    fn write_dsp_cell(&mut self, ci: &CellInfo) -> Result<(), EmitError> {
        let dev = self.dev;
        let tile_name = dev.tile_name(ci.bel.tile);
        let tile_side = tile_name.as_bytes()[4] as char;
        self.out.push(tile_name);
        self.out.push("DSP48");
        let (_, y) = dev.site_loc_in_tile(ci.bel);
        let dsp = format!("DSP_{y}");
        self.out.push(dsp.clone());

        // AREG/BREG value 1 shares the encoding of 2 in the user guide,
        // but vivado only sets bits for 0 and 2.
        let areg = ci.int_param("AREG", 1);
        if areg == 0 || areg == 2 {
            self.out.write_bit(&format!("AREG_{areg}"), true)?;
        }
        if ci.str_param("A_INPUT", "DIRECT") == "CASCADE" {
            self.out.write_bit("A_INPUT[0]", true)?;
        }

        let breg = ci.int_param("BREG", 1);
        if breg == 0 || breg == 2 {
            self.out.write_bit(&format!("BREG_{breg}"), true)?;
        }
        if ci.str_param("B_INPUT", "DIRECT") == "CASCADE" {
            self.out.write_bit("B_INPUT[0]", true)?;
        }

        if ci.str_param("USE_DPORT", "FALSE") == "TRUE" {
            self.out.write_bit("USE_DPORT[0]", true)?;
        }

        match ci.str_param("USE_SIMD", "ONE48").as_str() {
            "TWO24" => self.out.write_bit("USE_SIMD_FOUR12_TWO24", true)?,
            "FOUR12" => self.out.write_bit("USE_SIMD_FOUR12", true)?,
            _ => {}
        }

        let pattern = ci.str_param("PATTERN", "");
        if !pattern.is_empty() {
            self.out
                .write_vector("PATTERN[47:0]", &const_vector(&pattern, 48), false)?;
        }

        match ci.str_param("AUTORESET_PATDET", "NO_RESET").as_str() {
            "RESET_MATCH" => self.out.write_bit("AUTORESET_PATDET_RESET", true)?,
            "RESET_NOT_MATCH" => self
                .out
                .write_bit("AUTORESET_PATDET_RESET_NOT_MATCH", true)?,
            _ => {}
        }

        // Synthesis hands over 48 mask bits; only 46 are recognised and
        // the top two are constant zero, so they are truncated.
        let mask = ci.str_param(
            "MASK",
            "001111111111111111111111111111111111111111111111",
        );
        self.out
            .write_vector("MASK[45:0]", &const_vector(&mask, 46), false)?;

        match ci.str_param("SEL_MASK", "MASK").as_str() {
            "MASK" => {}
            "C" => self.out.write_bit("SEL_MASK_C", true)?,
            "ROUNDING_MODE1" => self.out.write_bit("SEL_MASK_ROUNDING_MODE1", true)?,
            "ROUNDING_MODE2" => self.out.write_bit("SEL_MASK_ROUNDING_MODE2", true)?,
            other => {
                return Err(EmitError::unsupported(
                    &ci.name,
                    format!("unknown SEL_MASK '{other}'"),
                ))
            }
        }

        self.out
            .write_bit("ZADREG[0]", !ci.bool_param("ADREG", true))?;
        self.out
            .write_bit("ZALUMODEREG[0]", !ci.bool_param("ALUMODEREG", false))?;
        self.out
            .write_bit("ZAREG_2_ACASCREG_1", !ci.bool_param("ACASCREG", false))?;
        self.out
            .write_bit("ZBREG_2_BCASCREG_1", !ci.bool_param("BCASCREG", false))?;
        self.out
            .write_bit("ZCARRYINREG[0]", !ci.bool_param("CARRYINREG", false))?;
        self.out
            .write_bit("ZCARRYINSELREG[0]", !ci.bool_param("CARRYINSELREG", false))?;
        self.out.write_bit("ZCREG[0]", !ci.bool_param("CREG", true))?;
        self.out.write_bit("ZDREG[0]", !ci.bool_param("DREG", true))?;
        self.out
            .write_bit("ZINMODEREG[0]", !ci.bool_param("INMODEREG", false))?;
        self.write_dsp_bus_zinv(ci, "ALUMODE", 4)?;
        self.write_dsp_bus_zinv(ci, "INMODE", 5)?;
        self.write_dsp_bus_zinv(ci, "OPMODE", 7)?;
        self.out
            .write_bit("ZMREG[0]", !ci.bool_param("MREG", false))?;
        self.out
            .write_bit("ZOPMODEREG[0]", !ci.bool_param("OPMODEREG", false))?;
        self.out
            .write_bit("ZPREG[0]", !ci.bool_param("PREG", false))?;
        self.out.write_bit(
            "USE_DPORT[0]",
            ci.str_param("USE_DPORT", "FALSE") == "TRUE",
        )?;
        self.out.write_bit(
            "ZIS_CLK_INVERTED",
            !ci.bool_param("IS_CLK_INVERTED", false),
        )?;
        self.out.write_bit(
            "ZIS_CARRYIN_INVERTED",
            !ci.bool_param("IS_CARRYIN_INVERTED", false),
        )?;
        self.out.pop_n(2);

        self.write_dsp_const_pins(ci, &dsp, tile_side, "GND")?;
        self.write_dsp_const_pins(ci, &dsp, tile_side, "VCC")?;

        self.out.pop();
        Ok(())
    }

    /// Per-bit inverted-sense bits of a control bus: a bit counts as
    /// inverted if either the bus-wide integer parameter has it set or
    /// the per-bit flag parameter does.
    fn write_dsp_bus_zinv(
        &mut self,
        ci: &CellInfo,
        name: &str,
        width: u32,
    ) -> Result<(), EmitError> {
        let bus_inv = ci.int_param(&format!("IS_{name}_INVERTED"), 0);
        for i in 0..width {
            let mut inv = (bus_inv >> i) & 1 != 0;
            inv |= ci.bool_param(&format!("IS_{name}[{i}]_INVERTED"), false);
            self.out
                .write_bit(&format!("ZIS_{name}_INVERTED[{i}]"), !inv)?;
        }
        Ok(())
    }

    /// Pins tied to a constant net, listed in the `DSP_GND_PINS` /
    /// `DSP_VCC_PINS` attributes; a pin with its inversion bit set ties
    /// to the opposite rail.
    fn write_dsp_const_pins(
        &mut self,
        ci: &CellInfo,
        dsp: &str,
        tile_side: char,
        const_net: &str,
    ) -> Result<(), EmitError> {
        let attr_value = ci.str_attr(&format!("DSP_{const_net}_PINS"), "");
        for pin in attr_value.split_whitespace() {
            let pin_basename: String = pin.chars().filter(|c| !c.is_ascii_digit()).collect();
            let inv = ci.bool_param(&format!("IS_{pin_basename}_INVERTED"), false);
            let net = if inv {
                if const_net == "GND" {
                    "VCC"
                } else {
                    "GND"
                }
            } else {
                const_net
            };
            self.out
                .write_bit(&format!("{dsp}_{pin}.DSP_{net}_{tile_side}"), true)?;
        }
        Ok(())
    }
}
