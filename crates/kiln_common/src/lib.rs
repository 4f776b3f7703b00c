//! Shared utility types for the kiln FPGA backend.

#![warn(missing_docs)]

pub mod bit_vec;

pub use bit_vec::BitVec;
