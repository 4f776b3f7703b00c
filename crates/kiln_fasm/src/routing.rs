//! Routing emission: one feature line (or pseudo-PIP substitution) per
//! used fabric PIP.

use crate::pseudo::{build_pseudo_pip_table, PseudoPipKey};
use crate::{EmitError, Emitter};
use kiln_device::{PipId, PipKind, TileId, WireIntent};
use std::io::Write;

impl<W: Write> Emitter<'_, W> {
    /// Walks every routed net and emits its used PIPs.
    ///
    /// Nets iterate in name order and wires in ID order, so the routing
    /// section is deterministic. This pass also populates `pips_by_tile`
    /// for the BRAM and clocking encoders.
    pub(crate) fn write_routing(&mut self) -> Result<(), EmitError> {
        self.pp_table = build_pseudo_pip_table();
        let design = self.design;
        for net in design.nets.values() {
            for (_, &pip) in &net.wires {
                if let Some(pip) = pip {
                    self.write_pip(pip)?;
                }
            }
            self.out.blank()?;
        }
        Ok(())
    }

    fn write_pip(&mut self, pip: PipId) -> Result<(), EmitError> {
        let dev = self.dev;
        self.pips_by_tile.entry(pip.tile).or_default().push(pip);

        let dst_wire = dev.pip_dst_wire(pip);
        match dev.wire_intent(dst_wire) {
            WireIntent::PseudoGnd | WireIntent::PseudoVcc => return Ok(()),
            WireIntent::Generic => {}
        }

        let pd = dev.pip_data(pip);
        if pd.kind != PipKind::TileRouting {
            return Ok(());
        }

        let tile_name = dev.tile_name(pip.tile);
        let mut src_name = dev.wire_name(dev.pip_src_wire(pip)).to_string();
        let mut dst_name = dev.wire_name(dst_wire).to_string();

        let key = PseudoPipKey::new(dev.tile_type_name(pip.tile), &dst_name, &src_name);
        if let Some(features) = self.pp_table.get(&key).cloned() {
            let is_top_sing = is_sing_ioi(tile_name) && is_top_half(self, pip.tile);
            for feature in &features {
                let mut feature = feature.clone();
                if is_top_sing {
                    // Single-height tile above its HCLK uses the Y1 site.
                    if let Some(pos) = feature.find("Y0") {
                        feature.replace_range(pos..pos + 2, "Y1");
                    }
                }
                self.out.write_line(&format!("{tile_name}.{feature}"))?;
            }
            return Ok(());
        }

        if pd.is_route_thru {
            log::warn!("unprocessed route-thru {tile_name}.{dst_name}.{src_name}");
        }

        if tile_name.starts_with("DSP_L") || tile_name.starts_with("DSP_R") {
            // No PPIP data for DSP tiles yet; their routing carries no bits.
            return Ok(());
        }

        let orig_dst_name = dst_name.clone();
        if is_sing_ioi(tile_name) {
            // PPIPs missing for SING IOI3s.
            if (src_name.contains("IMUX") || src_name.contains("CTRL0"))
                && !dst_name.contains("CLK")
            {
                return Ok(());
            }
            if let Some(pos) = src_name.find("_SING_") {
                src_name.replace_range(pos..pos + 6, "_");
            }
            if is_top_half(self, pip.tile) {
                if let Some(pos) = dst_name.find("_0") {
                    dst_name.replace_range(pos..pos + 2, "_1");
                }
                if let Some(pos) = dst_name.find("OLOGIC0") {
                    dst_name.replace_range(pos..pos + 7, "OLOGIC1");
                    if let Some(pos) = src_name.find("_0") {
                        src_name.replace_range(pos..pos + 2, "_1");
                    }
                }
            }
        }

        if tile_name.contains("IOI")
            && dst_name.contains("OCLKB")
            && src_name.contains("IOI_OCLKM_")
        {
            // Missing from the database; possibly not a real PPIP.
            return Ok(());
        }

        self.out
            .write_line(&format!("{tile_name}.{dst_name}.{src_name}"))?;

        if tile_name.contains("IOI") && dst_name.starts_with("IOI_OCLK_") {
            // OCLK and OCLKM are configured as a pair; mirror the line onto
            // the M copy while that wire is unbound.
            let mut dst_m = dst_name.clone();
            let mut orig_dst_m = orig_dst_name;
            let pos = dst_m.find("OCLK").unwrap() + 4;
            dst_m.insert(pos, 'M');
            orig_dst_m.insert(pos, 'M');

            let wire = self
                .dev
                .wire_by_name(&format!("{tile_name}/{orig_dst_m}"))
                .unwrap_or_else(|| panic!("missing OCLKM wire {tile_name}/{orig_dst_m}"));
            if self.design.wire_net(wire).is_none() {
                self.out
                    .write_line(&format!("{tile_name}.{dst_m}.{src_name}"))?;
            }
        }

        Ok(())
    }

    /// Names of wires on used PIPs in a tile that start with `prefix`.
    ///
    /// `is_source` selects the source or destination side. Only meaningful
    /// after the routing pass has populated `pips_by_tile`.
    pub(crate) fn used_wires_starting_with(
        &self,
        tile: TileId,
        prefix: &str,
        is_source: bool,
    ) -> Vec<String> {
        let Some(pips) = self.pips_by_tile.get(&tile) else {
            return Vec::new();
        };
        let mut wires = Vec::new();
        for &pip in pips {
            let wire = if is_source {
                self.dev.pip_src_wire(pip)
            } else {
                self.dev.pip_dst_wire(pip)
            };
            let name = self.dev.wire_name(wire);
            if name.starts_with(prefix) {
                wires.push(name.to_string());
            }
        }
        wires
    }
}

/// Whether this is a single-height I/O tile (no partner half).
fn is_sing_ioi(tile_name: &str) -> bool {
    tile_name.starts_with("RIOI3_SING")
        || tile_name.starts_with("LIOI3_SING")
        || tile_name.starts_with("RIOI_SING")
}

/// Whether a SING tile sits above its bank's HCLK row.
fn is_top_half<W: Write>(emitter: &Emitter<'_, W>, tile: TileId) -> bool {
    tile < emitter.dev.hclk_for_ioi(tile)
}
