//! BCH forward error correction simulation.
//!
//! [`ecc`] holds the codecs, [`sim`] the harness that measures how often they
//! restore corrupted packets.

pub mod ecc;
pub mod error;
pub mod sim;

pub use ecc::{BchCode, BlockCodec, DecodeStatus};
pub use error::{Error, Result};
pub use sim::{CodecAdapter, CodecConfig, ErrorModel, SweepConfig, SweepExecutor, SweepResult};
