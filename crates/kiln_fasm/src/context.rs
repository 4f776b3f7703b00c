//! The FASM writer: hierarchical prefix stack and line emission.
//!
//! Every feature line is the dot-joined prefix stack followed by the line
//! name. Vector features append a Verilog-style sized binary literal with
//! the most significant bit first:
//!
//! ```text
//! CLBLL_L_X2Y10.SLICEL_X0.ALUT.INIT[63:0] = 64'b111111110000...
//! CLBLM_L_X0Y0.SLICEM_X0.AFF.ZINI
//! ```
//!
//! Blank lines separate logical blocks; consecutive blanks collapse.

use kiln_common::BitVec;
use std::io::{self, Write};

/// Line-oriented FASM output with a hierarchical name prefix.
pub struct FasmWriter<W: Write> {
    out: W,
    prefix: Vec<String>,
    last_was_blank: bool,
}

impl<W: Write> FasmWriter<W> {
    /// Creates a writer over an output stream.
    ///
    /// The stream starts in the "after blank" state so a leading separator
    /// is never emitted.
    pub fn new(out: W) -> Self {
        Self {
            out,
            prefix: Vec::new(),
            last_was_blank: true,
        }
    }

    /// Pushes a prefix element.
    pub fn push(&mut self, element: impl Into<String>) {
        self.prefix.push(element.into());
    }

    /// Pops the innermost prefix element.
    ///
    /// # Panics
    ///
    /// Panics if the prefix stack is empty.
    pub fn pop(&mut self) {
        assert!(self.prefix.pop().is_some(), "prefix stack underflow");
    }

    /// Pops the innermost `n` prefix elements.
    pub fn pop_n(&mut self, n: usize) {
        for _ in 0..n {
            self.pop();
        }
    }

    /// Current depth of the prefix stack.
    pub fn depth(&self) -> usize {
        self.prefix.len()
    }

    /// Emits a single blank separator line; repeated calls collapse.
    pub fn blank(&mut self) -> io::Result<()> {
        if !self.last_was_blank {
            writeln!(self.out)?;
        }
        self.last_was_blank = true;
        Ok(())
    }

    fn write_prefix(&mut self) -> io::Result<()> {
        for element in &self.prefix {
            write!(self.out, "{element}.")?;
        }
        self.last_was_blank = false;
        Ok(())
    }

    /// Emits `prefix.name` iff `value` is true.
    pub fn write_bit(&mut self, name: &str, value: bool) -> io::Result<()> {
        if value {
            self.write_prefix()?;
            writeln!(self.out, "{name}")?;
        }
        Ok(())
    }

    /// Emits a full line ignoring the prefix stack.
    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{line}")?;
        self.last_was_blank = false;
        Ok(())
    }

    /// Emits `prefix.name = W'b<bits>` with the most significant bit first.
    ///
    /// With `invert`, every bit is complemented on output.
    pub fn write_vector(&mut self, name: &str, bits: &BitVec, invert: bool) -> io::Result<()> {
        self.write_prefix()?;
        write!(self.out, "{name} = {}'b", bits.width())?;
        for i in (0..bits.width()).rev() {
            let bit = bits.get(i) ^ invert;
            write!(self.out, "{}", if bit { '1' } else { '0' })?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    /// Emits an integer as a sized binary vector feature.
    pub fn write_int_vector(
        &mut self,
        name: &str,
        value: u64,
        width: u32,
        invert: bool,
    ) -> io::Result<()> {
        self.write_vector(name, &BitVec::from_u64(value, width).resized(width), invert)
    }

    /// Consumes the writer, returning the underlying stream.
    pub fn into_inner(self) -> W {
        self.out
    }
}
