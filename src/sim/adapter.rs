//! Codec adapter: one validated codec instance plus its derived parameters.

use crate::ecc::{BchCode, BlockCodec, DecodeStatus};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Requested code: correction strength t over GF(2^m)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Guaranteed number of correctable bit errors (t)
    pub strength: usize,
    /// Field order m of GF(2^m)
    pub field_order: usize,
}

impl CodecConfig {
    pub fn new(strength: usize, field_order: usize) -> Self {
        Self {
            strength,
            field_order,
        }
    }

    /// Reject values that can never describe a code
    pub fn validate(&self) -> Result<()> {
        if self.strength == 0 {
            return Err(Error::Configuration("strength must be positive".to_string()));
        }
        if self.field_order == 0 {
            return Err(Error::Configuration(
                "field order must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Display for CodecConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "t={}, m={}", self.strength, self.field_order)
    }
}

/// Read-only parameters derived from a constructed codec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecParameters {
    /// n = 2^m - 1
    pub codeword_length_bits: usize,
    pub ecc_bits: usize,
    /// ceil(ecc_bits / 8)
    pub ecc_bytes: usize,
    /// floor(n / 8) - ecc_bytes
    pub max_data_length_bytes: usize,
    pub primitive_polynomial: u32,
    pub field_order: usize,
    pub strength: usize,
}

impl CodecParameters {
    fn from_codec<C: BlockCodec>(codec: &C) -> Self {
        let codeword_length_bits = codec.code_length();
        let ecc_bits = codec.ecc_bits();
        let ecc_bytes = ecc_bits.div_ceil(8);

        Self {
            codeword_length_bits,
            ecc_bits,
            ecc_bytes,
            max_data_length_bytes: (codeword_length_bits / 8).saturating_sub(ecc_bytes),
            primitive_polynomial: codec.primitive_polynomial(),
            field_order: codec.field_order(),
            strength: codec.strength(),
        }
    }

    /// Payload plus ecc, in bytes
    pub fn packet_len(&self) -> usize {
        self.max_data_length_bytes + self.ecc_bytes
    }
}

/// Wraps one codec instance for reuse across every trial of a configuration.
///
/// `decode` takes `&mut self` because the codec keeps the located error
/// positions for the following `correct`; workers running trials in
/// parallel each need their own clone.
#[derive(Debug, Clone)]
pub struct CodecAdapter<C = BchCode> {
    codec: C,
    params: CodecParameters,
}

impl CodecAdapter<BchCode> {
    /// Construct the BCH code for `config`
    ///
    /// # Errors
    ///
    /// `Error::Configuration` when t is incompatible with m
    pub fn new(config: CodecConfig) -> Result<Self> {
        config.validate()?;
        let codec = BchCode::new(config.field_order, config.strength, None)?;
        Self::from_codec(codec)
    }

    /// Largest strength the BCH codec accepts for `field_order`, `None` when
    /// not even t = 1 is constructible
    pub fn max_strength(field_order: usize) -> Option<usize> {
        BchCode::max_strength(field_order)
    }
}

impl<C: BlockCodec> CodecAdapter<C> {
    /// Wrap an already constructed codec
    pub fn from_codec(codec: C) -> Result<Self> {
        let params = CodecParameters::from_codec(&codec);
        if params.max_data_length_bytes == 0 {
            return Err(Error::Configuration(format!(
                "codec with t={} over GF(2^{}) has no room for a payload",
                params.strength, params.field_order
            )));
        }
        Ok(Self { codec, params })
    }

    pub fn parameters(&self) -> &CodecParameters {
        &self.params
    }

    /// Compute the ecc of a full-length payload
    ///
    /// # Errors
    ///
    /// `Error::LengthMismatch` unless `payload` is exactly
    /// `max_data_length_bytes` long
    pub fn encode(&self, payload: &[u8]) -> Result<Vec<u8>> {
        if payload.len() != self.params.max_data_length_bytes {
            return Err(Error::LengthMismatch {
                expected: self.params.max_data_length_bytes,
                actual: payload.len(),
            });
        }
        self.codec.encode(payload)
    }

    /// Decode a received (data, ecc) pair of a full-length payload.
    ///
    /// The expected payload length is handed to the codec on every call.
    pub fn decode(&mut self, data: &[u8], ecc: &[u8]) -> Result<DecodeStatus> {
        self.codec
            .decode(data, ecc, self.params.max_data_length_bytes)
    }

    /// Apply the correction located by the previous `decode` in place
    pub fn correct(&self, data: &mut [u8], ecc: &mut [u8]) {
        self.codec.correct(data, ecc)
    }
}
