//! FASM emission core.
//!
//! Converts a fully placed-and-routed design into an FPGA assembly (FASM)
//! text stream: one feature line per enabled configuration bit or vector,
//! grouped per tile, later assembled into a bitstream by an external tool.
//!
//! Emission is one-shot, single-threaded, and deterministic: encoders run
//! in a fixed order (logic → config → I/O → routing → BRAM → clocking →
//! IP blocks) and iterate cells, nets, and wires over sorted keys, so two
//! runs over the same input produce byte-identical output. The routing
//! pass records every used PIP per tile; the BRAM and clocking passes
//! consume that record afterwards.
//!
//! ```no_run
//! # fn demo(design: &kiln_design::Design, device: &kiln_device::Device)
//! #     -> Result<(), kiln_fasm::EmitError> {
//! kiln_fasm::write_fasm_to_path(design, device, "out.fasm")?;
//! # Ok(())
//! # }
//! ```

pub mod bram;
pub mod cfg;
pub mod clocking;
pub mod cmt;
pub mod context;
pub mod dsp;
pub mod io;
pub mod logic;
pub mod pseudo;
pub mod routing;
pub mod tables;

use context::FasmWriter;
use io::BankIoConfig;
use kiln_design::Design;
use kiln_device::{Device, PipId, TileId};
use pseudo::PseudoPipTable;
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::Path;

/// Errors that can abort an emission run.
///
/// There is no partial-output policy: a failed run's output must be
/// discarded.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// The output stream could not be opened or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A cell has a type or original type the backend cannot encode.
    #[error("cell '{cell}': {detail}")]
    UnsupportedCell {
        /// The offending cell's name.
        cell: String,
        /// What was unsupported about it.
        detail: String,
    },

    /// A cell parameter is out of range or illegal for its placement.
    #[error("cell '{cell}': {detail}")]
    InvalidParam {
        /// The offending cell's name.
        cell: String,
        /// What was wrong with the parameter.
        detail: String,
    },
}

impl EmitError {
    /// Convenience constructor for [`EmitError::UnsupportedCell`].
    pub fn unsupported(cell: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::UnsupportedCell {
            cell: cell.into(),
            detail: detail.into(),
        }
    }

    /// Convenience constructor for [`EmitError::InvalidParam`].
    pub fn invalid_param(cell: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::InvalidParam {
            cell: cell.into(),
            detail: detail.into(),
        }
    }
}

/// One emission run over a bound design.
///
/// Owns the writer and the cross-encoder state: the pseudo-PIP table, the
/// per-tile record of used PIPs, and the per-bank I/O aggregation.
pub struct Emitter<'a, W: Write> {
    pub(crate) dev: &'a Device,
    pub(crate) design: &'a Design,
    pub(crate) out: FasmWriter<W>,
    pub(crate) pp_table: PseudoPipTable,
    pub(crate) pips_by_tile: HashMap<TileId, Vec<PipId>>,
    pub(crate) bank_config: BTreeMap<TileId, BankIoConfig>,
}

impl<'a, W: Write> Emitter<'a, W> {
    /// Creates an emitter over an output stream.
    pub fn new(design: &'a Design, dev: &'a Device, out: W) -> Self {
        Self {
            dev,
            design,
            out: FasmWriter::new(out),
            pp_table: PseudoPipTable::new(),
            pips_by_tile: HashMap::new(),
            bank_config: BTreeMap::new(),
        }
    }

    /// Runs all encoders in their fixed order.
    pub fn run(&mut self) -> Result<(), EmitError> {
        self.write_logic()?;
        debug_assert_eq!(self.out.depth(), 0, "prefix stack imbalance after logic");
        self.write_cfg()?;
        debug_assert_eq!(self.out.depth(), 0, "prefix stack imbalance after cfg");
        self.write_io()?;
        debug_assert_eq!(self.out.depth(), 0, "prefix stack imbalance after io");
        self.write_routing()?;
        debug_assert_eq!(self.out.depth(), 0, "prefix stack imbalance after routing");
        self.write_bram()?;
        debug_assert_eq!(self.out.depth(), 0, "prefix stack imbalance after bram");
        self.write_clocking()?;
        debug_assert_eq!(self.out.depth(), 0, "prefix stack imbalance after clocking");
        self.write_ip()?;
        assert_eq!(self.out.depth(), 0, "prefix stack imbalance");
        Ok(())
    }
}

/// Emits the design's FASM stream to a writer.
pub fn write_fasm<W: Write>(design: &Design, dev: &Device, out: W) -> Result<(), EmitError> {
    Emitter::new(design, dev, out).run()
}

/// Emits the design's FASM stream to a file.
///
/// Failing to create the file is fatal; the OS error is carried in
/// [`EmitError::Io`].
pub fn write_fasm_to_path(
    design: &Design,
    dev: &Device,
    path: impl AsRef<Path>,
) -> Result<(), EmitError> {
    let file = std::fs::File::create(path)?;
    let mut out = std::io::BufWriter::new(file);
    write_fasm(design, dev, &mut out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures;

#[cfg(test)]
mod emission_tests;
