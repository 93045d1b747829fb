//! Block error correction codecs driven by the simulation harness.
//!
//! The harness only talks to a codec through [`BlockCodec`]: it reads the
//! code's parameters, computes ecc bytes for a payload, decodes a received
//! (data, ecc) pair and then asks the codec to apply whatever correction the
//! decode step located.
//!
//! Currently implemented:
//! - Binary BCH codes over GF(2^m) ([`bch::BchCode`])

use crate::error::Result;

/// Outcome of a decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStatus {
    /// The received block is consistent once this many bits are flipped.
    /// Zero means the block was already a valid codeword.
    Correctable(usize),
    /// More errors than the code can locate. A following `correct` call
    /// leaves the buffers untouched.
    Uncorrectable,
}

impl DecodeStatus {
    /// Number of errors reported by the codec, if it could locate them
    pub fn error_count(&self) -> Option<usize> {
        match self {
            DecodeStatus::Correctable(count) => Some(*count),
            DecodeStatus::Uncorrectable => None,
        }
    }
}

/// Contract of a systematic block codec with a separate ecc field.
///
/// `decode` records the located error positions inside the codec and
/// `correct` applies them, so the two calls must see the same buffers.
/// The payload length is passed to `decode` explicitly instead of living in
/// codec state.
pub trait BlockCodec {
    /// Field order m of GF(2^m)
    fn field_order(&self) -> usize;

    /// Guaranteed correction capability t
    fn strength(&self) -> usize;

    /// Full codeword length n in bits
    fn code_length(&self) -> usize;

    /// Number of redundancy bits
    fn ecc_bits(&self) -> usize;

    /// Number of bytes needed to hold the redundancy bits
    fn ecc_bytes(&self) -> usize {
        self.ecc_bits().div_ceil(8)
    }

    /// Primitive polynomial defining the field
    fn primitive_polynomial(&self) -> u32;

    /// Compute the ecc bytes for `data`
    fn encode(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Locate errors in `data[..data_len]` and `ecc`
    fn decode(&mut self, data: &[u8], ecc: &[u8], data_len: usize) -> Result<DecodeStatus>;

    /// Flip the bits located by the previous `decode` call
    fn correct(&self, data: &mut [u8], ecc: &mut [u8]);
}

/// Binary BCH codes
pub mod bch;
pub use bch::{create_bch_code, BchCode};
