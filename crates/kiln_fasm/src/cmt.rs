//! Clock management tile emission: PLLE2_ADV and MMCME2_ADV.
//!
//! Each clock output is described by a real-valued divider and phase that
//! decompose into counter high/low times, an edge bit, a phase mux, a
//! delay count, and (on the fractional-capable outputs) a 3-bit fraction.

use crate::tables::{filter_lookup, LOCK_TABLE};
use crate::{EmitError, Emitter};
use kiln_design::CellInfo;
use std::io::Write;

/// Decomposed counter settings for one clock output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClkoutCounter {
    /// Cycles the output is high.
    pub high: i64,
    /// Cycles the output is low.
    pub low: i64,
    /// High and low times differ (odd division).
    pub edge: bool,
    /// Division of one or less: the counter is bypassed.
    pub no_count: bool,
    /// Eighth-cycle phase selection.
    pub phasemux: i64,
    /// Whole-cycle phase delay.
    pub delaytime: i64,
    /// Eighths of a cycle beyond the integer division.
    pub frac: i64,
}

/// Decomposes a divider and phase into counter settings.
///
/// `with_frac` enables the fractional part (only the fractional-capable
/// outputs compute it).
pub fn clkout_counter(divide: f64, phase: f64, with_frac: bool) -> ClkoutCounter {
    let mut counter = ClkoutCounter {
        high: 1,
        low: 1,
        edge: false,
        no_count: false,
        phasemux: 0,
        delaytime: 0,
        frac: 0,
    };
    if divide <= 1.0 {
        counter.no_count = true;
    } else {
        counter.high = (divide / 2.0).floor() as i64;
        counter.low = divide.floor() as i64 - counter.high;
        counter.edge = counter.high != counter.low;
        if with_frac {
            counter.frac = (divide * 8.0).floor() as i64 - (divide.floor() as i64) * 8;
        }
        let phase_eights = ((phase / 360.0) * divide * 8.0).floor() as i64;
        counter.phasemux = phase_eights % 8;
        counter.delaytime = phase_eights / 8;
    }
    counter
}

/// Parses and range-checks the feedback multiplier used to index the
/// lock and filter tables.
fn clkfbout_mult_index(ci: &CellInfo, param: &str) -> Result<usize, EmitError> {
    let mult = ci.f64_param(param, 5.0) as i64;
    if !(1..=64).contains(&mult) {
        return Err(EmitError::invalid_param(
            &ci.name,
            format!("{param} must be in 1..=64, got {mult}"),
        ));
    }
    Ok((mult - 1) as usize)
}

impl<W: Write> Emitter<'_, W> {
    fn write_pll_clkout(&mut self, name: &str, ci: &CellInfo) -> Result<(), EmitError> {
        let divide_param = if name == "CLKFBOUT" {
            format!("{name}_MULT")
        } else {
            format!("{name}_DIVIDE")
        };
        let divide = ci.f64_param(&divide_param, 1.0);
        let phase = ci.f64_param(&format!("{name}_PHASE"), 1.0);
        let with_frac = name == "CLKOUT1" || name == "CLKFBOUT";
        let c = clkout_counter(divide, phase, with_frac);

        let used = name == "DIVCLK"
            || name == "CLKFBOUT"
            || self.design.port_net(ci, name).is_some();

        if name == "DIVCLK" {
            self.out
                .write_int_vector("DIVCLK_DIVCLK_HIGH_TIME[5:0]", c.high as u64, 6, false)?;
            self.out
                .write_int_vector("DIVCLK_DIVCLK_LOW_TIME[5:0]", c.low as u64, 6, false)?;
            self.out.write_bit("DIVCLK_DIVCLK_EDGE[0]", c.edge)?;
            self.out.write_bit("DIVCLK_DIVCLK_NO_COUNT[0]", c.no_count)?;
        } else if used {
            self.out
                .write_bit(&format!("{name}_CLKOUT1_OUTPUT_ENABLE[0]"), true)?;
            self.out.write_int_vector(
                &format!("{name}_CLKOUT1_HIGH_TIME[5:0]"),
                c.high as u64,
                6,
                false,
            )?;
            self.out.write_int_vector(
                &format!("{name}_CLKOUT1_LOW_TIME[5:0]"),
                c.low as u64,
                6,
                false,
            )?;
            self.out.write_int_vector(
                &format!("{name}_CLKOUT1_PHASE_MUX[2:0]"),
                c.phasemux as u64,
                3,
                false,
            )?;
            self.out
                .write_bit(&format!("{name}_CLKOUT2_EDGE[0]"), c.edge)?;
            self.out
                .write_bit(&format!("{name}_CLKOUT2_NO_COUNT[0]"), c.no_count)?;
            self.out.write_int_vector(
                &format!("{name}_CLKOUT2_DELAY_TIME[5:0]"),
                c.delaytime as u64,
                6,
                false,
            )?;
            if c.frac != 0 {
                self.out
                    .write_bit(&format!("{name}_CLKOUT2_FRAC_EN[0]"), c.edge)?;
                self.out.write_int_vector(
                    &format!("{name}_CLKOUT2_FRAC[2:0]"),
                    c.frac as u64,
                    3,
                    false,
                )?;
            }
        }
        Ok(())
    }

    pub(crate) fn write_pll(&mut self, ci: &CellInfo) -> Result<(), EmitError> {
        self.out.push(self.dev.tile_name(ci.bel.tile));
        self.out.push("PLLE2_ADV");
        self.out.write_bit("IN_USE", true)?;
        // Natural-sense names despite the Z prefix; prjxray database quirk.
        self.out
            .write_bit("ZINV_PWRDWN", ci.bool_param("IS_PWRDWN_INVERTED", false))?;
        self.out
            .write_bit("ZINV_RST", ci.bool_param("IS_RST_INVERTED", false))?;
        self.out
            .write_bit("INV_CLKINSEL", ci.bool_param("IS_CLKINSEL_INVERTED", false))?;
        for name in [
            "DIVCLK", "CLKFBOUT", "CLKOUT0", "CLKOUT1", "CLKOUT2", "CLKOUT3", "CLKOUT4", "CLKOUT5",
        ] {
            self.write_pll_clkout(name, ci)?;
        }

        let comp = ci.str_param("COMPENSATION", "INTERNAL");
        self.out.push("COMPENSATION");
        if comp == "INTERNAL" {
            self.out.write_bit("Z_ZHOLD_OR_CLKIN_BUF", true)?;
        } else {
            return Err(EmitError::invalid_param(
                &ci.name,
                format!("unsupported compensation type '{comp}'"),
            ));
        }
        self.out.pop();

        let index = clkfbout_mult_index(ci, "CLKFBOUT_MULT")?;
        let bandwidth = ci.str_param("BANDWIDTH", "OPTIMIZED");
        self.out.write_int_vector(
            "FILTREG1_RESERVED[11:0]",
            filter_lookup(&bandwidth, index) as u64,
            12,
            false,
        )?;
        self.out
            .write_int_vector("LKTABLE[39:0]", LOCK_TABLE[index], 40, false)?;
        self.out.write_bit("LOCKREG3_RESERVED[0]", true)?;
        self.out.write_int_vector("TABLE[9:0]", 0x3B4, 10, false)?;
        self.out.pop_n(2);
        Ok(())
    }

    fn write_mmcm_clkout(&mut self, name: &str, ci: &CellInfo) -> Result<(), EmitError> {
        let divide_param = if name == "CLKFBOUT" {
            format!("{name}_MULT_F")
        } else if name == "CLKOUT0" {
            format!("{name}_DIVIDE_F")
        } else {
            format!("{name}_DIVIDE")
        };
        let divide = ci.f64_param(&divide_param, 1.0);
        let phase = ci.f64_param(&format!("{name}_PHASE"), 1.0);
        let with_frac = name == "CLKOUT0" || name == "CLKFBOUT";
        let mut c = clkout_counter(divide, phase, with_frac);

        let used = name == "DIVCLK"
            || name == "CLKFBOUT"
            || self.design.port_net(ci, name).is_some();

        if name == "DIVCLK" {
            self.out
                .write_int_vector("DIVCLK_DIVCLK_HIGH_TIME[5:0]", c.high as u64, 6, false)?;
            self.out
                .write_int_vector("DIVCLK_DIVCLK_LOW_TIME[5:0]", c.low as u64, 6, false)?;
            self.out.write_bit("DIVCLK_DIVCLK_EDGE[0]", c.edge)?;
            self.out.write_bit("DIVCLK_DIVCLK_NO_COUNT[0]", c.no_count)?;
            return Ok(());
        }
        if !used {
            return Ok(());
        }

        let is_clkout_5_or_6 = name == "CLKOUT5" || name == "CLKOUT6";

        if with_frac && c.frac != 0 {
            c.high -= 1;
            c.low -= 1;

            // CLKOUT0's fraction lives in the CLKOUT5 shared register,
            // CLKFBOUT's in CLKOUT6's.
            let frac_shifted = c.frac >> 1;
            let frac_conf = if name == "CLKOUT0" {
                "CLKOUT5_CLKOUT2_"
            } else {
                "CLKOUT6_CLKOUT2_"
            };
            if frac_shifted >= 1 {
                self.out
                    .write_bit(&format!("{frac_conf}FRACTIONAL_FRAC_WF_F[0]"), true)?;
                self.out.write_int_vector(
                    &format!("{frac_conf}FRACTIONAL_PHASE_MUX_F[1:0]"),
                    frac_shifted as u64,
                    2,
                    false,
                )?;
            }
        }

        self.out
            .write_bit(&format!("{name}_CLKOUT1_OUTPUT_ENABLE[0]"), true)?;
        self.out.write_int_vector(
            &format!("{name}_CLKOUT1_HIGH_TIME[5:0]"),
            c.high as u64,
            6,
            false,
        )?;
        self.out.write_int_vector(
            &format!("{name}_CLKOUT1_LOW_TIME[5:0]"),
            c.low as u64,
            6,
            false,
        )?;
        self.out.write_int_vector(
            &format!("{name}_CLKOUT1_PHASE_MUX[2:0]"),
            c.phasemux as u64,
            3,
            false,
        )?;

        let edge_feature = if is_clkout_5_or_6 {
            format!("{name}_CLKOUT2_FRACTIONAL_EDGE[0]")
        } else {
            format!("{name}_CLKOUT2_EDGE[0]")
        };
        self.out.write_bit(&edge_feature, c.edge)?;

        let no_count_feature = if is_clkout_5_or_6 {
            format!("{name}_CLKOUT2_FRACTIONAL_NO_COUNT[0]")
        } else {
            format!("{name}_CLKOUT2_NO_COUNT[0]")
        };
        self.out.write_bit(&no_count_feature, c.no_count)?;

        let delay_feature = if is_clkout_5_or_6 {
            format!("{name}_CLKOUT2_FRACTIONAL_DELAY_TIME[5:0]")
        } else {
            format!("{name}_CLKOUT2_DELAY_TIME[5:0]")
        };
        self.out
            .write_int_vector(&delay_feature, c.delaytime as u64, 6, false)?;

        if !is_clkout_5_or_6 && c.frac != 0 {
            self.out
                .write_bit(&format!("{name}_CLKOUT2_FRAC_EN[0]"), true)?;
            self.out
                .write_bit(&format!("{name}_CLKOUT2_FRAC_WF_R[0]"), true)?;
            self.out.write_int_vector(
                &format!("{name}_CLKOUT2_FRAC[2:0]"),
                c.frac as u64,
                3,
                false,
            )?;
        }
        Ok(())
    }

    pub(crate) fn write_mmcm(&mut self, ci: &CellInfo) -> Result<(), EmitError> {
        self.out.push(self.dev.tile_name(ci.bel.tile));
        self.out.push("MMCME2_ADV");
        self.out.write_bit("IN_USE", true)?;
        // Natural-sense names despite the Z prefix; prjxray database quirk.
        self.out
            .write_bit("ZINV_PWRDWN", ci.bool_param("IS_PWRDWN_INVERTED", false))?;
        self.out
            .write_bit("ZINV_RST", ci.bool_param("IS_RST_INVERTED", false))?;
        self.out
            .write_bit("ZINV_PSEN", ci.bool_param("IS_PSEN_INVERTED", false))?;
        self.out
            .write_bit("ZINV_PSINCDEC", ci.bool_param("IS_PSINCDEC_INVERTED", false))?;
        self.out
            .write_bit("INV_CLKINSEL", ci.bool_param("IS_CLKINSEL_INVERTED", false))?;
        for name in [
            "DIVCLK", "CLKFBOUT", "CLKOUT0", "CLKOUT1", "CLKOUT2", "CLKOUT3", "CLKOUT4",
            "CLKOUT5", "CLKOUT6",
        ] {
            self.write_mmcm_clkout(name, ci)?;
        }

        let comp = ci.str_param("COMPENSATION", "INTERNAL");
        self.out.push("COMP");
        if comp == "INTERNAL" || comp == "ZHOLD" {
            // Vivado sets the same bit for both modes.
            self.out.write_bit("Z_ZHOLD", true)?;
        } else {
            return Err(EmitError::invalid_param(
                &ci.name,
                format!("unsupported compensation type '{comp}'"),
            ));
        }
        self.out.pop();

        let index = clkfbout_mult_index(ci, "CLKFBOUT_MULT_F")?;
        self.out
            .write_int_vector("LKTABLE[39:0]", LOCK_TABLE[index], 40, false)?;

        let bandwidth = ci.str_param("BANDWIDTH", "OPTIMIZED");
        self.out.write_int_vector(
            "FILTREG1_RESERVED[11:0]",
            filter_lookup(&bandwidth, index) as u64,
            12,
            false,
        )?;

        // 0xffff enables both the integer and fractional counters.
        self.out.write_int_vector(
            "POWER_REG_POWER_REG_POWER_REG[15:0]",
            0xffff,
            16,
            false,
        )?;
        self.out.write_bit("LOCKREG3_RESERVED[0]", true)?;
        self.out.write_int_vector("TABLE[9:0]", 0x3D4, 10, false)?;
        self.out.pop_n(2);
        Ok(())
    }
}
