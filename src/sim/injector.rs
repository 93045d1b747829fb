//! Bit error injection models.
//!
//! Both models corrupt a whole packet (payload followed by ecc) in place.
//! Bit `b` of byte `i` is the bit with value `1 << b`, and the packet is
//! viewed as one flat bit sequence `i * 8 + b` for bursts.

use crate::error::{Error, Result};
use bitvec::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Corruption model applied to each packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ErrorModel {
    /// Independent uniform draws over the packet, with replacement.
    ///
    /// Two draws may hit the same bit and cancel, so fewer than `count`
    /// bits can end up flipped.
    #[default]
    Scattered,
    /// One contiguous run of `count` bits starting at bit 0 of a random byte
    Burst,
}

impl ErrorModel {
    /// Flip `count` bits of `packet` according to the model.
    ///
    /// # Errors
    ///
    /// `Error::Injection` when a burst of `count` bits does not fit in the
    /// packet, or when bits are requested from an empty packet.
    pub fn inject<R: Rng + ?Sized>(self, packet: &mut [u8], count: usize, rng: &mut R) -> Result<()> {
        if count == 0 {
            return Ok(());
        }

        let bits = packet.len() * 8;
        if bits == 0 {
            return Err(Error::Injection { count, bits });
        }

        match self {
            ErrorModel::Scattered => {
                for _ in 0..count {
                    let byte = rng.gen_range(0..packet.len());
                    let bit: u32 = rng.gen_range(0..8);
                    packet[byte] ^= 1 << bit;
                }
            }
            ErrorModel::Burst => {
                if count > bits {
                    return Err(Error::Injection { count, bits });
                }

                // Last byte at which a byte-aligned run of `count` bits still fits
                let last_start = (bits - count) / 8;
                let start = rng.gen_range(0..=last_start) * 8;

                let view = packet.view_bits_mut::<Lsb0>();
                for position in start..start + count {
                    let flipped = !view[position];
                    view.set(position, flipped);
                }
            }
        }

        Ok(())
    }
}

impl Display for ErrorModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorModel::Scattered => write!(f, "scattered"),
            ErrorModel::Burst => write!(f, "burst"),
        }
    }
}

/// Number of bit positions at which two equally long buffers differ
pub fn bit_distance(a: &[u8], b: &[u8]) -> usize {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x ^ y).count_ones() as usize)
        .sum()
}
