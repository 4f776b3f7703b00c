//! Configuration-center emission: BSCAN, DCIRESET, ICAP, and STARTUP
//! cells placed in `CFG_CENTER_*` tiles.

use crate::{EmitError, Emitter};
use std::io::Write;

impl<W: Write> Emitter<'_, W> {
    pub(crate) fn write_cfg(&mut self) -> Result<(), EmitError> {
        let design = self.design;
        let dev = self.dev;
        for ci in design.cells.values() {
            let tile_name = dev.tile_name(ci.bel.tile);
            if !tile_name.starts_with("CFG_CENTER_") {
                continue;
            }

            self.out.push(tile_name);
            match ci.kind.as_str() {
                "BSCAN" => {
                    self.out.push("BSCAN");
                    let chain = ci.int_param("JTAG_CHAIN", 1);
                    if !(1..=4).contains(&chain) {
                        return Err(EmitError::invalid_param(
                            &ci.name,
                            format!("invalid JTAG_CHAIN number {chain}; allowed values are 1-4"),
                        ));
                    }
                    self.out.write_bit(&format!("JTAG_CHAIN_{chain}"), true)?;
                    self.out.pop();
                }
                "DCIRESET_DCIRESET" => {
                    self.out.write_bit("DCIRESET.ENABLED", true)?;
                }
                "ICAP_ICAP" => {
                    self.out.push("ICAP");
                    let width = ci.str_param("ICAP_WIDTH", "X32");
                    match width.as_str() {
                        "X32" => {}
                        "X16" => self.out.write_bit("ICAP_WIDTH_X16", true)?,
                        "X8" => self.out.write_bit("ICAP_WIDTH_X8", true)?,
                        other => {
                            return Err(EmitError::invalid_param(
                                &ci.name,
                                format!(
                                    "unknown ICAP_WIDTH '{other}'; allowed values are X32, X16 and X8"
                                ),
                            ))
                        }
                    }
                    self.out.pop();
                }
                "STARTUP_STARTUP" => {
                    let prog_usr = ci.str_param("PROG_USR", "FALSE");
                    if prog_usr != "TRUE" && prog_usr != "FALSE" {
                        return Err(EmitError::invalid_param(
                            &ci.name,
                            format!(
                                "invalid PROG_USR '{prog_usr}'; allowed values are TRUE, FALSE"
                            ),
                        ));
                    }
                    self.out
                        .write_bit("STARTUP.PROG_USR", prog_usr == "TRUE")?;
                    let usrcclko_constant = design
                        .port_net(ci, "USRCCLKO")
                        .map(|net| net.is_constant())
                        .unwrap_or(false);
                    self.out
                        .write_bit("STARTUP.USRCCLKO_CONNECTED", !usrcclko_constant)?;
                }
                _ => {}
            }
            self.out.pop();
        }
        Ok(())
    }
}
