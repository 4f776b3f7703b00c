//! I/O emission: pad electrical settings, per-bank aggregation, and the
//! IOLOGIC cell encoders (ILOGIC/OLOGIC/ISERDES/OSERDES/IDELAY/ODELAY).

use crate::{EmitError, Emitter};
use kiln_design::CellInfo;
use std::io::Write;

/// Bank-wide settings accumulated while processing the bank's pads,
/// flushed onto the bank's HCLK tile at the end of the I/O pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct BankIoConfig {
    /// An I/O standard below the bank voltage is in use.
    pub stepdown: bool,
    /// A VREF-referenced input standard (SSTL) is in use.
    pub vref: bool,
    /// TMDS_33 is in use somewhere in the bank.
    pub tmds_33: bool,
    /// LVDS_25 is in use somewhere in the bank.
    pub lvds_25: bool,
    /// A differential-only standard is in use.
    pub only_diff: bool,
}

/// Cell kinds handled by the IOLOGIC encoder.
const IOLOGIC_KINDS: &[&str] = &[
    "ILOGICE3_IFF",
    "OLOGICE2_OUTFF",
    "OLOGICE3_OUTFF",
    "OSERDESE2_OSERDESE2",
    "ISERDESE2_ISERDESE2",
    "IDELAYE2_IDELAYE2",
    "ODELAYE2_ODELAYE2",
];

impl<W: Write> Emitter<'_, W> {
    /// Emits every pad and IOLOGIC cell, then flushes bank aggregates.
    pub(crate) fn write_io(&mut self) -> Result<(), EmitError> {
        let design = self.design;
        for cell in design.cells.values() {
            if cell.kind == "PAD" {
                self.write_io_config(cell)?;
                self.out.blank()?;
            } else if IOLOGIC_KINDS.contains(&cell.kind.as_str()) {
                self.write_iol_config(cell)?;
                self.out.blank()?;
            }
        }

        let banks: Vec<_> = self.bank_config.iter().map(|(k, v)| (*k, *v)).collect();
        for (hclk, bank) in banks {
            self.out.push(self.dev.tile_name(hclk));
            self.out.write_bit("STEPDOWN", bank.stepdown)?;
            self.out.write_bit("VREF.V_675_MV", bank.vref)?;
            self.out.write_bit("ONLY_DIFF_IN_USE", bank.only_diff)?;
            self.out.write_bit("TMDS_33_IN_USE", bank.tmds_33)?;
            self.out.write_bit("LVDS_25_IN_USE", bank.lvds_25)?;
            self.out.pop();
        }
        Ok(())
    }

    fn write_io_config(&mut self, pad: &CellInfo) -> Result<(), EmitError> {
        let dev = self.dev;
        let design = self.design;
        let pad_net = design
            .port_net(pad, "PAD")
            .unwrap_or_else(|| panic!("pad cell '{}' has no PAD net", pad.name));
        let mut iostandard = pad.str_attr("IOSTANDARD", "LVCMOS33");
        let pulltype = pad.str_attr("PULLTYPE", "NONE");
        let slew = pad.str_attr("SLEW", "SLOW");

        let (_, io_y) = dev.site_loc_in_tile(pad.bel);
        let is_output = pad_net.driver.is_some();
        let is_input = pad_net.users.iter().any(|u| {
            design
                .cell(&u.cell)
                .map(|c| c.kind.contains("INBUF"))
                .unwrap_or(false)
        });
        let tile = dev.tile_name(pad.bel.tile);
        self.out.push(tile);

        let is_riob18 = tile.starts_with("RIOB18_");
        let is_sing = tile.contains("_SING_");
        let is_top_sing = pad.bel.tile < dev.hclk_for_iob(pad.bel);
        let mut is_stepdown = false;
        let is_lvcmos = iostandard.starts_with("LVCMOS");
        let is_low_volt_lvcmos =
            matches!(iostandard.as_str(), "LVCMOS12" | "LVCMOS15" | "LVCMOS18");

        let y = if is_sing {
            if is_top_sing {
                1
            } else {
                0
            }
        } else {
            1 - io_y
        };
        self.out.push(format!("IOB_Y{y}"));

        let has_diff_prefix = iostandard.starts_with("DIFF_");
        let is_tmds33 = iostandard == "TMDS_33";
        let is_lvds25 = iostandard == "LVDS_25";
        let is_lvds = iostandard.starts_with("LVDS");
        let only_diff = is_tmds33 || is_lvds;
        let is_diff = only_diff || has_diff_prefix;
        if has_diff_prefix {
            iostandard = iostandard[5..].to_string();
        }
        let is_sstl = matches!(iostandard.as_str(), "SSTL12" | "SSTL135" | "SSTL15");

        let hclk = dev.hclk_for_iob(pad.bel);
        {
            let bank = self.bank_config.entry(hclk).or_default();
            if only_diff {
                bank.only_diff = true;
            }
            if is_tmds33 {
                bank.tmds_33 = true;
            }
            if is_lvds25 {
                bank.lvds_25 = true;
            }
        }

        if is_output {
            let default_drive = if is_riob18 && iostandard == "LVCMOS12" {
                8
            } else {
                12
            };
            let drive = pad.int_attr("DRIVE", default_drive);

            if (iostandard == "LVCMOS33" || iostandard == "LVTTL") && is_riob18 {
                return Err(EmitError::invalid_param(
                    &pad.name,
                    format!("high performance banks (RIOB18) do not support IO standard {iostandard}"),
                ));
            }

            if iostandard == "SSTL135" {
                self.out.write_bit("SSTL135.DRIVE.I_FIXED", true)?;
            } else if is_riob18 {
                if iostandard == "LVCMOS18" || iostandard == "LVCMOS15" {
                    self.out
                        .write_bit("LVCMOS15_LVCMOS18.DRIVE.I12_I16_I2_I4_I6_I8", true)?;
                } else if iostandard == "LVCMOS12" {
                    self.out.write_bit("LVCMOS12.DRIVE.I2_I4_I6_I8", true)?;
                } else if iostandard == "LVDS" {
                    self.out.write_bit("LVDS.DRIVE.I_FIXED", true)?;
                } else if is_sstl {
                    self.out
                        .write_bit(&format!("{iostandard}.DRIVE.I_FIXED"), true)?;
                }
            } else {
                if iostandard == "TMDS_33" && y == 0 {
                    self.out.write_bit("TMDS_33.DRIVE.I_FIXED", true)?;
                    self.out.write_bit("TMDS_33.OUT", true)?;
                } else if iostandard == "LVDS_25" && y == 0 {
                    self.out.write_bit("LVDS_25.DRIVE.I_FIXED", true)?;
                    self.out.write_bit("LVDS_25.OUT", true)?;
                } else if (iostandard == "LVCMOS15" && drive == 16) || iostandard == "SSTL15" {
                    self.out
                        .write_bit("LVCMOS15_SSTL15.DRIVE.I16_I_FIXED", true)?;
                } else if iostandard == "LVCMOS18" && (drive == 12 || drive == 8) {
                    self.out.write_bit("LVCMOS18.DRIVE.I12_I8", true)?;
                } else if (iostandard == "LVCMOS33" || iostandard == "LVTTL") && drive == 16 {
                    self.out.write_bit("LVCMOS33_LVTTL.DRIVE.I12_I16", true)?;
                } else if (iostandard == "LVCMOS33" || iostandard == "LVTTL")
                    && (drive == 8 || drive == 12)
                {
                    self.out.write_bit("LVCMOS33_LVTTL.DRIVE.I12_I8", true)?;
                } else if (iostandard == "LVCMOS33" || iostandard == "LVTTL") && drive == 4 {
                    self.out.write_bit("LVCMOS33_LVTTL.DRIVE.I4", true)?;
                } else if drive == 8 && (iostandard == "LVCMOS12" || iostandard == "LVCMOS25") {
                    self.out.write_bit("LVCMOS12_LVCMOS25.DRIVE.I8", true)?;
                } else if drive == 4
                    && matches!(iostandard.as_str(), "LVCMOS15" | "LVCMOS18" | "LVCMOS25")
                {
                    self.out
                        .write_bit("LVCMOS15_LVCMOS18_LVCMOS25.DRIVE.I4", true)?;
                } else if is_lvcmos || iostandard == "LVTTL" {
                    self.out
                        .write_bit(&format!("{iostandard}.DRIVE.I{drive}"), true)?;
                }
            }

            if is_riob18 && is_sstl {
                self.out.write_bit(&format!("{iostandard}.IN_USE"), true)?;
            }

            if is_riob18 && slew == "SLOW" {
                if iostandard == "SSTL135" {
                    self.out.write_bit("SSTL135.SLEW.SLOW", true)?;
                } else if iostandard == "SSTL15" {
                    self.out.write_bit("SSTL15.SLEW.SLOW", true)?;
                } else {
                    self.out
                        .write_bit("LVCMOS12_LVCMOS15_LVCMOS18.SLEW.SLOW", true)?;
                }
            } else if slew == "SLOW" {
                if iostandard != "LVDS_25" && iostandard != "TMDS_33" {
                    self.out.write_bit(
                        "LVCMOS12_LVCMOS15_LVCMOS18_LVCMOS25_LVCMOS33_LVTTL_SSTL135_SSTL15.SLEW.SLOW",
                        true,
                    )?;
                }
            } else if is_riob18 {
                self.out
                    .write_bit(&format!("{iostandard}.SLEW.FAST"), true)?;
            } else if iostandard == "SSTL135" || iostandard == "SSTL15" {
                self.out.write_bit("SSTL135_SSTL15.SLEW.FAST", true)?;
            } else {
                self.out.write_bit(
                    "LVCMOS12_LVCMOS15_LVCMOS18_LVCMOS25_LVCMOS33_LVTTL.SLEW.FAST",
                    true,
                )?;
            }
        }

        if is_input {
            if !is_diff {
                if matches!(iostandard.as_str(), "LVCMOS33" | "LVTTL" | "LVCMOS25") {
                    if !is_riob18 {
                        self.out.write_bit("LVCMOS25_LVCMOS33_LVTTL.IN", true)?;
                    } else {
                        return Err(EmitError::invalid_param(
                            &pad.name,
                            format!(
                                "high performance banks (RIOB18) do not support IO standard {iostandard}"
                            ),
                        ));
                    }
                }

                if is_sstl {
                    self.bank_config.entry(hclk).or_default().vref = true;
                    if !is_riob18 {
                        self.out.write_bit("SSTL135_SSTL15.IN", true)?;
                    }
                    if is_riob18 {
                        self.out.write_bit("SSTL12_SSTL135_SSTL15.IN", true)?;
                    }
                    if !is_riob18 && pad.has_attr("IN_TERM") {
                        let term = pad.str_attr("IN_TERM", "");
                        self.out.write_bit(&format!("IN_TERM.{term}"), true)?;
                    }
                }

                if is_low_volt_lvcmos {
                    self.out
                        .write_bit("LVCMOS12_LVCMOS15_LVCMOS18.IN", true)?;
                }
            } else {
                if is_riob18 {
                    // These bits exist only on Y0 of a differential pair.
                    if y == 0 {
                        self.out
                            .write_bit("LVDS_SSTL12_SSTL135_SSTL15.IN_DIFF", true)?;
                        if iostandard == "LVDS" {
                            self.out.write_bit("LVDS.IN_USE", true)?;
                        }
                    }
                } else if iostandard == "TMDS_33" {
                    self.out.write_bit("TMDS_33.IN_DIFF", true)?;
                } else {
                    self.out
                        .write_bit("LVDS_25_SSTL135_SSTL15.IN_DIFF", true)?;
                }

                if pad.has_attr("IN_TERM") {
                    let term = pad.str_attr("IN_TERM", "");
                    self.out.write_bit(&format!("IN_TERM.{term}"), true)?;
                }
            }

            if !is_output {
                if is_riob18 {
                    if is_diff && y == 0 {
                        self.out.write_bit("LVDS.IN_ONLY", true)?;
                    } else {
                        self.out.write_bit(
                            "LVCMOS12_LVCMOS15_LVCMOS18_SSTL12_SSTL135_SSTL15.IN_ONLY",
                            true,
                        )?;
                    }
                } else {
                    self.out.write_bit(
                        "LVCMOS12_LVCMOS15_LVCMOS18_LVCMOS25_LVCMOS33_LVDS_25_LVTTL_SSTL135_SSTL15_TMDS_33.IN_ONLY",
                        true,
                    )?;
                }
            }
        }

        if !is_riob18 && (is_low_volt_lvcmos || is_sstl) {
            if iostandard == "SSTL12" {
                return Err(EmitError::invalid_param(
                    &pad.name,
                    "SSTL12 is only available on high performance banks",
                ));
            }
            self.out.write_bit(
                "LVCMOS12_LVCMOS15_LVCMOS18_SSTL135_SSTL15.STEPDOWN",
                true,
            )?;
            self.bank_config.entry(hclk).or_default().stepdown = true;
            is_stepdown = true;
        }

        if is_input && is_output && !is_diff && y == 1 && is_riob18 && iostandard.starts_with("SSTL")
        {
            self.out.write_bit("SSTL12_SSTL135_SSTL15.IN", true)?;
        }

        self.out.write_bit(&format!("PULLTYPE.{pulltype}"), true)?;
        self.out.pop(); // IOB_Yn

        let site = dev.bel_site_name(pad.bel);
        let inv_name = if is_riob18 {
            format!("{site}/IOB18S/O_ININV")
        } else {
            format!("{site}/IOB33S/O_ININV")
        };
        if let Some(inv) = dev.bel_by_name(&inv_name) {
            if design.cell_bound_to(inv).is_some() {
                self.out.write_bit("OUT_DIFF", true)?;
            }
        }

        if is_stepdown && !is_sing {
            self.out.write_bit(
                &format!("IOB_Y{io_y}.LVCMOS12_LVCMOS15_LVCMOS18_SSTL135_SSTL15.STEPDOWN"),
                true,
            )?;
        }

        self.out.pop(); // tile
        Ok(())
    }

    fn write_iol_config(&mut self, ci: &CellInfo) -> Result<(), EmitError> {
        let dev = self.dev;
        let design = self.design;
        let tile = dev.tile_name(ci.bel.tile);
        self.out.push(tile);
        let is_sing = tile.contains("_SING_");
        let is_top_sing = ci.bel.tile < dev.hclk_for_ioi(ci.bel.tile);

        let site = dev.bel_site_name(ci.bel);
        let site_type = site.split('_').next().unwrap_or(site);
        let (_, site_y) = dev.site_loc_in_tile(ci.bel);
        let y = if is_sing {
            if is_top_sing {
                1
            } else {
                0
            }
        } else {
            1 - site_y
        };
        self.out.push(format!("{site_type}_Y{y}"));

        match ci.kind.as_str() {
            "ILOGICE3_IFF" => {
                self.out.write_bit("IDDR.IN_USE", true)?;
                self.out.write_bit("IDDR_OR_ISERDES.IN_USE", true)?;
                self.out.write_bit("ISERDES.MODE.MASTER", true)?;
                self.out.write_bit("ISERDES.NUM_CE.N1", true)?;

                // The IDELMUXE3 setting includes the IDELAY element when an
                // IDELAYE2 drives D.
                let driver = design
                    .port_net(ci, "D")
                    .and_then(|net| net.driver.as_ref())
                    .and_then(|drv| design.cell(&drv.cell))
                    .unwrap_or_else(|| panic!("{} '{}' has disconnected D input", ci.kind, ci.name));
                if driver.kind.contains("IDELAYE2") {
                    self.out.write_bit("IDELMUXE3.P0", true)?;
                } else {
                    self.out.write_bit("IDELMUXE3.P1", true)?;
                }

                let edge = ci.str_param("DDR_CLK_EDGE", "OPPOSITE_EDGE");
                match edge.as_str() {
                    "SAME_EDGE" => self.out.write_bit("IFF.DDR_CLK_EDGE.SAME_EDGE", true)?,
                    "OPPOSITE_EDGE" => {
                        self.out.write_bit("IFF.DDR_CLK_EDGE.OPPOSITE_EDGE", true)?
                    }
                    _ => {
                        return Err(EmitError::invalid_param(
                            &ci.name,
                            format!(
                                "unsupported clock edge '{edge}' at {site}; supported are SAME_EDGE and OPPOSITE_EDGE"
                            ),
                        ))
                    }
                }

                if ci.str_param("SRTYPE", "SYNC") == "SYNC" {
                    self.out.write_bit("IFF.SRTYPE.SYNC", true)?;
                } else {
                    self.out.write_bit("IFF.SRTYPE.ASYNC", true)?;
                }

                self.out
                    .write_bit("IFF.ZINV_C", !ci.bool_param("IS_CLK_INVERTED", false))?;
                self.out
                    .write_bit("ZINV_D", !ci.bool_param("IS_D_INVERTED", false))?;

                self.out
                    .write_bit("IFF.ZINIT_Q1", ci.int_param("INIT_Q1", 0) == 0)?;
                self.out
                    .write_bit("IFF.ZINIT_Q2", ci.int_param("INIT_Q2", 0) == 0)?;

                if ci.str_attr("X_ORIG_PORT_SR", "R") == "R" {
                    self.out.write_bit("IFF.ZSRVAL_Q1", true)?;
                    self.out.write_bit("IFF.ZSRVAL_Q2", true)?;
                }
            }
            "OLOGICE2_OUTFF" | "OLOGICE3_OUTFF" => {
                if ci.str_param("DDR_CLK_EDGE", "OPPOSITE_EDGE") == "SAME_EDGE" {
                    self.out.write_bit("ODDR.DDR_CLK_EDGE.SAME_EDGE", true)?;
                }

                self.out.write_bit("ODDR_TDDR.IN_USE", true)?;
                self.out.write_bit("OQUSED", true)?;
                self.out.write_bit("OSERDES.DATA_RATE_OQ.DDR", true)?;
                self.out.write_bit("OSERDES.DATA_RATE_TQ.BUF", true)?;

                if ci.str_param("SRTYPE", "SYNC") == "SYNC" {
                    self.out.write_bit("OSERDES.SRTYPE.SYNC", true)?;
                }

                for d in ["D1", "D2"] {
                    self.out.write_bit(
                        &format!("IS_{d}_INVERTED"),
                        ci.bool_param(&format!("IS_{d}_INVERTED"), false),
                    )?;
                }

                self.out
                    .write_bit("ZINIT_OQ", ci.int_param("INIT", 1) == 0)?;

                self.out
                    .write_bit("ODDR.SRUSED", design.port_net(ci, "SR").is_some())?;
                if ci.str_attr("X_ORIG_PORT_SR", "R") == "R" {
                    self.out.write_bit("ZSRVAL_OQ", true)?;
                }

                self.out
                    .write_bit("ZINV_CLK", !ci.bool_param("IS_CLK_INVERTED", false))?;
            }
            "OSERDESE2_OSERDESE2" => {
                self.out.write_bit("ODDR.DDR_CLK_EDGE.SAME_EDGE", true)?;
                self.out.write_bit("ODDR.SRUSED", true)?;
                self.out.write_bit("ODDR_TDDR.IN_USE", true)?;
                self.out
                    .write_bit("OQUSED", design.port_net(ci, "OQ").is_some())?;
                self.out
                    .write_bit("ZINV_CLK", !ci.bool_param("IS_CLK_INVERTED", false))?;
                for t in ["T1", "T2", "T3", "T4"] {
                    let value = (design.port_net(ci, t).is_some() || t == "T1")
                        && !ci.bool_param(&format!("IS_{t}_INVERTED"), false);
                    self.out.write_bit(&format!("ZINV_{t}"), value)?;
                }
                for d in ["D1", "D2", "D3", "D4", "D5", "D6", "D7", "D8"] {
                    self.out.write_bit(
                        &format!("IS_{d}_INVERTED"),
                        ci.bool_param(&format!("IS_{d}_INVERTED"), false),
                    )?;
                }
                self.out
                    .write_bit("ZINIT_OQ", !ci.bool_param("INIT_OQ", false))?;
                self.out
                    .write_bit("ZINIT_TQ", !ci.bool_param("INIT_TQ", false))?;
                self.out
                    .write_bit("ZSRVAL_OQ", !ci.bool_param("SRVAL_OQ", false))?;
                self.out
                    .write_bit("ZSRVAL_TQ", !ci.bool_param("SRVAL_TQ", false))?;

                self.out.push("OSERDES");
                self.out.write_bit("IN_USE", true)?;
                let rate_oq = ci.str_param("DATA_RATE_OQ", "DDR");
                let oq_rate = if design.port_net(ci, "OQ").is_some() {
                    rate_oq.clone()
                } else {
                    "DDR".to_string()
                };
                self.out
                    .write_bit(&format!("DATA_RATE_OQ.{oq_rate}"), true)?;
                let tq_rate = if design.port_net(ci, "TQ").is_some() {
                    ci.str_param("DATA_RATE_TQ", "DDR")
                } else {
                    "BUF".to_string()
                };
                self.out
                    .write_bit(&format!("DATA_RATE_TQ.{tq_rate}"), true)?;
                let width = ci.int_param("DATA_WIDTH", 8);
                if rate_oq == "DDR" {
                    self.out
                        .write_bit(&format!("DATA_WIDTH.DDR.W{width}"), true)?;
                } else if rate_oq == "SDR" {
                    self.out
                        .write_bit(&format!("DATA_WIDTH.SDR.W{width}"), true)?;
                } else {
                    self.out.write_bit(&format!("DATA_WIDTH.W{width}"), true)?;
                }
                self.out.write_bit("SRTYPE.SYNC", true)?;
                self.out.write_bit("TSRTYPE.SYNC", true)?;
                self.out.pop();
            }
            "ISERDESE2_ISERDESE2" => {
                let data_rate = ci.str_param("DATA_RATE", "");
                self.out.write_bit("IDDR_OR_ISERDES.IN_USE", true)?;
                if data_rate == "DDR" {
                    self.out.write_bit("IDDR.IN_USE", true)?;
                }
                self.out
                    .write_bit("IFF.DDR_CLK_EDGE.OPPOSITE_EDGE", true)?;
                self.out.write_bit("IFF.SRTYPE.SYNC", true)?;
                for i in 1..=4 {
                    self.out.write_bit(
                        &format!("IFF.ZINIT_Q{i}"),
                        !ci.bool_param(&format!("INIT_Q{i}"), false),
                    )?;
                    self.out.write_bit(
                        &format!("IFF.ZSRVAL_Q{i}"),
                        !ci.bool_param(&format!("SRVAL_Q{i}"), false),
                    )?;
                }
                self.out
                    .write_bit("IFF.ZINV_C", !ci.bool_param("IS_CLK_INVERTED", false))?;
                self.out
                    .write_bit("IFF.ZINV_OCLK", !ci.bool_param("IS_OCLK_INVERTED", false))?;

                let iobdelay = ci.str_param("IOBDELAY", "NONE");
                self.out
                    .write_bit("IFFDELMUXE3.P0", iobdelay == "IFD")?;
                self.out.write_bit(
                    "ZINV_D",
                    !ci.bool_param("IS_D_INVERTED", false) && iobdelay != "IFD",
                )?;

                self.out.push("ISERDES");
                self.out.write_bit("IN_USE", true)?;
                self.out
                    .write_bit("OFB_USED", ci.str_param("OFB_USED", "FALSE") == "TRUE")?;
                let width = ci.int_param("DATA_WIDTH", 8);
                let mode = ci.str_param("INTERFACE_TYPE", "NETWORKING");
                let rate = ci.str_param("DATA_RATE", "DDR");
                self.out
                    .write_bit(&format!("{mode}.{rate}.W{width}"), true)?;
                let serdes_mode = ci.str_param("SERDES_MODE", "MASTER");
                self.out.write_bit(&format!("MODE.{serdes_mode}"), true)?;
                let num_ce = ci.int_param("NUM_CE", 1);
                self.out.write_bit(&format!("NUM_CE.N{num_ce}"), true)?;
                self.out.pop();
            }
            "IDELAYE2_IDELAYE2" => {
                self.out.write_bit("IN_USE", true)?;
                self.out
                    .write_bit("CINVCTRL_SEL", ci.str_param("CINVCTRL_SEL", "FALSE") == "TRUE")?;
                self.out
                    .write_bit("PIPE_SEL", ci.str_param("PIPE_SEL", "FALSE") == "TRUE")?;
                self.out.write_bit(
                    "HIGH_PERFORMANCE_MODE",
                    ci.str_param("HIGH_PERFORMANCE_MODE", "FALSE") == "TRUE",
                )?;
                let delay_src = ci.str_param("DELAY_SRC", "IDATAIN");
                self.out
                    .write_bit(&format!("DELAY_SRC_{delay_src}"), true)?;
                let delay_type = ci.str_param("IDELAY_TYPE", "FIXED");
                self.out
                    .write_bit(&format!("IDELAY_TYPE_{delay_type}"), true)?;
                let value = ci.int_param("IDELAY_VALUE", 0) as u64;
                self.out
                    .write_int_vector("IDELAY_VALUE[4:0]", value, 5, false)?;
                self.out
                    .write_int_vector("ZIDELAY_VALUE[4:0]", value, 5, true)?;
                self.out.write_bit(
                    "IS_DATAIN_INVERTED",
                    ci.bool_param("IS_DATAIN_INVERTED", false),
                )?;
                self.out.write_bit(
                    "IS_IDATAIN_INVERTED",
                    ci.bool_param("IS_IDATAIN_INVERTED", false),
                )?;
            }
            "ODELAYE2_ODELAYE2" => {
                self.out.write_bit("IN_USE", true)?;
                self.out
                    .write_bit("CINVCTRL_SEL", ci.str_param("CINVCTRL_SEL", "FALSE") == "TRUE")?;
                self.out.write_bit(
                    "HIGH_PERFORMANCE_MODE",
                    ci.str_param("HIGH_PERFORMANCE_MODE", "FALSE") == "TRUE",
                )?;
                let delay_type = ci.str_param("ODELAY_TYPE", "FIXED");
                if delay_type != "FIXED" {
                    self.out
                        .write_bit(&format!("ODELAY_TYPE_{delay_type}"), true)?;
                }
                let value = ci.int_param("ODELAY_VALUE", 0) as u64;
                self.out
                    .write_int_vector("ODELAY_VALUE[4:0]", value, 5, false)?;
                self.out
                    .write_int_vector("ZODELAY_VALUE[4:0]", value, 5, true)?;
                self.out
                    .write_bit("ZINV_ODATAIN", !ci.bool_param("IS_ODATAIN_INVERTED", false))?;
            }
            other => {
                return Err(EmitError::unsupported(
                    &ci.name,
                    format!("unsupported IOLOGIC '{other}'"),
                ))
            }
        }
        self.out.pop_n(2);
        Ok(())
    }
}
