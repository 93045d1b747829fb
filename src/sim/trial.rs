//! A single encode, corrupt, decode, correct and verify cycle.

use crate::ecc::{BlockCodec, DecodeStatus};
use crate::error::Result;
use crate::sim::adapter::CodecAdapter;
use crate::sim::injector::{bit_distance, ErrorModel};
use log::debug;
use rand::Rng;
use sha2::{Digest, Sha256};
use std::fmt::{Display, Formatter};

/// Why a trial did not restore the original packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrialFailure {
    /// The codec reported more errors than it can correct
    Uncorrectable,
    /// The codec accepted the block but the result differs from the original
    Miscorrected,
    /// Encoding, injection or decoding returned an error
    Fault(String),
}

impl Display for TrialFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TrialFailure::Uncorrectable => write!(f, "uncorrectable"),
            TrialFailure::Miscorrected => write!(f, "miscorrected"),
            TrialFailure::Fault(reason) => write!(f, "fault: {}", reason),
        }
    }
}

/// Outcome of one trial
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialResult {
    pub strength: usize,
    /// Number of bit errors requested from the error model (t + delta)
    pub injected_errors: usize,
    /// Number of bits that actually differ after injection
    pub effective_errors: usize,
    /// Error count returned by decode, `None` if uncorrectable or never reached
    pub reported_errors: Option<usize>,
    pub success: bool,
    pub failure: Option<TrialFailure>,
}

/// Runs trials against a codec adapter with a fixed error model
#[derive(Debug, Clone, Copy)]
pub struct TrialRunner {
    model: ErrorModel,
    delta: usize,
}

impl TrialRunner {
    /// `delta` extra errors are injected on top of the configured strength
    pub fn new(model: ErrorModel, delta: usize) -> Self {
        Self { model, delta }
    }

    pub fn model(&self) -> ErrorModel {
        self.model
    }

    pub fn delta(&self) -> usize {
        self.delta
    }

    /// Run one trial on a random payload.
    ///
    /// Errors raised anywhere in the cycle are folded into the result as a
    /// [`TrialFailure::Fault`].
    pub fn execute<C, R>(&self, adapter: &mut CodecAdapter<C>, rng: &mut R) -> TrialResult
    where
        C: BlockCodec,
        R: Rng + ?Sized,
    {
        let mut payload = vec![0u8; adapter.parameters().max_data_length_bytes];
        rng.fill(&mut payload[..]);

        let model = self.model;
        let count = self.injected_count(adapter);
        self.execute_with(adapter, payload, |packet| model.inject(packet, count, rng))
    }

    /// Run one trial on `payload`, corrupting the packet with `corrupt`
    /// instead of the configured error model.
    pub fn execute_with<C, F>(
        &self,
        adapter: &mut CodecAdapter<C>,
        payload: Vec<u8>,
        corrupt: F,
    ) -> TrialResult
    where
        C: BlockCodec,
        F: FnOnce(&mut [u8]) -> Result<()>,
    {
        let mut result = TrialResult {
            strength: adapter.parameters().strength,
            injected_errors: self.injected_count(adapter),
            effective_errors: 0,
            reported_errors: None,
            success: false,
            failure: None,
        };

        if let Err(e) = Self::cycle(adapter, payload, corrupt, &mut result) {
            result.success = false;
            result.failure = Some(TrialFailure::Fault(e.to_string()));
        }

        result
    }

    fn injected_count<C: BlockCodec>(&self, adapter: &CodecAdapter<C>) -> usize {
        adapter.parameters().strength + self.delta
    }

    fn cycle<C, F>(
        adapter: &mut CodecAdapter<C>,
        payload: Vec<u8>,
        corrupt: F,
        result: &mut TrialResult,
    ) -> Result<()>
    where
        C: BlockCodec,
        F: FnOnce(&mut [u8]) -> Result<()>,
    {
        let data_len = payload.len();
        let ecc = adapter.encode(&payload)?;

        let mut packet = payload;
        packet.extend_from_slice(&ecc);
        let original_digest = Sha256::digest(&packet);
        let original = packet.clone();

        corrupt(&mut packet)?;
        result.effective_errors = bit_distance(&original, &packet);

        let (data, ecc) = packet.split_at_mut(data_len);
        let status = adapter.decode(data, ecc)?;
        result.reported_errors = status.error_count();

        // Applied even when the decode gave up
        adapter.correct(data, ecc);

        let corrected_digest = Sha256::digest(&packet);
        result.success = original_digest == corrected_digest;
        result.failure = match (result.success, status) {
            (true, _) => None,
            (false, DecodeStatus::Uncorrectable) => Some(TrialFailure::Uncorrectable),
            (false, DecodeStatus::Correctable(_)) => Some(TrialFailure::Miscorrected),
        };

        debug!(
            "t={} injected={} effective={} reported={:?} sha256 {} -> {}",
            result.strength,
            result.injected_errors,
            result.effective_errors,
            result.reported_errors,
            hex::encode(original_digest),
            hex::encode(corrected_digest)
        );

        Ok(())
    }
}
