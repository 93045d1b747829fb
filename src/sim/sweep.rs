//! Strength sweeps: many independent trials per correction strength.
//!
//! Every trial draws its randomness from its own ChaCha20 stream derived
//! from (seed, strength, trial index). A seeded sweep therefore gives the same
//! numbers whether trials run sequentially or spread over a rayon pool.

use crate::ecc::BlockCodec;
use crate::error::{Error, Result};
use crate::sim::adapter::{CodecAdapter, CodecConfig};
use crate::sim::injector::ErrorModel;
use crate::sim::trial::{TrialFailure, TrialResult, TrialRunner};
use log::{info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Parameters of one sweep over t = 1..=max_strength for a fixed m
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Field order m of GF(2^m)
    pub field_order: usize,
    /// Trials per strength
    pub trials: usize,
    pub model: ErrorModel,
    /// Extra errors injected beyond each strength
    pub delta: usize,
    /// Upper end of the strength range; discovered from the codec when unset
    pub max_strength: Option<usize>,
    /// Base seed; drawn from entropy when unset
    pub seed: Option<u64>,
    /// Spread the trials of each strength over a rayon pool
    pub parallel: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            field_order: 9,
            trials: 1000,
            model: ErrorModel::Scattered,
            delta: 0,
            max_strength: None,
            seed: None,
            parallel: false,
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(Error::Configuration(
                "trial count must be positive".to_string(),
            ));
        }
        if self.field_order == 0 {
            return Err(Error::Configuration(
                "field order must be positive".to_string(),
            ));
        }
        if self.max_strength == Some(0) {
            return Err(Error::Configuration(
                "maximum strength must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Aggregated trial outcomes for one strength
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrengthOutcome {
    pub strength: usize,
    pub trials: usize,
    pub successes: usize,
    pub uncorrectable: usize,
    pub miscorrected: usize,
    pub faults: usize,
    /// Set when no codec could be built for this strength
    pub configuration_error: Option<String>,
}

impl StrengthOutcome {
    pub fn new(strength: usize) -> Self {
        Self {
            strength,
            ..Self::default()
        }
    }

    /// Outcome of a strength whose codec could not be constructed: every
    /// planned trial counts as a failure
    pub fn unconstructible(strength: usize, trials: usize, reason: String) -> Self {
        Self {
            strength,
            trials,
            configuration_error: Some(reason),
            ..Self::default()
        }
    }

    /// Build an outcome from bare counts; `successes` is capped at `trials`
    pub fn from_counts(strength: usize, trials: usize, successes: usize) -> Self {
        Self {
            strength,
            trials,
            successes: successes.min(trials),
            ..Self::default()
        }
    }

    pub fn failures(&self) -> usize {
        self.trials.saturating_sub(self.successes)
    }

    pub fn success_rate(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.successes.min(self.trials) as f64 / self.trials as f64
        }
    }

    fn record(&mut self, result: &TrialResult) {
        self.trials += 1;
        match &result.failure {
            None if result.success => self.successes += 1,
            None => {}
            Some(TrialFailure::Uncorrectable) => self.uncorrectable += 1,
            Some(TrialFailure::Miscorrected) => self.miscorrected += 1,
            Some(TrialFailure::Fault(_)) => self.faults += 1,
        }
    }
}

/// Per-strength outcomes of a sweep, ordered by increasing strength
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepResult {
    /// Base seed the trials were derived from
    pub seed: u64,
    rows: Vec<StrengthOutcome>,
}

impl SweepResult {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rows: Vec::new(),
        }
    }

    /// Append the outcome of the next strength
    ///
    /// # Errors
    ///
    /// `Error::InvalidInput` if `outcome.strength` does not exceed the last row's
    pub fn push(&mut self, outcome: StrengthOutcome) -> Result<()> {
        if let Some(last) = self.rows.last() {
            if outcome.strength <= last.strength {
                return Err(Error::InvalidInput(format!(
                    "strength {} pushed after {}",
                    outcome.strength, last.strength
                )));
            }
        }
        self.rows.push(outcome);
        Ok(())
    }

    pub fn rows(&self) -> &[StrengthOutcome] {
        &self.rows
    }

    /// (strength, success rate) pairs in increasing strength order
    pub fn rates(&self) -> Vec<(usize, f64)> {
        self.rows
            .iter()
            .map(|row| (row.strength, row.success_rate()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Runs a [`SweepConfig`]
#[derive(Debug, Clone)]
pub struct SweepExecutor {
    config: SweepConfig,
}

impl SweepExecutor {
    pub fn new(config: SweepConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Strengths covered by the sweep
    ///
    /// # Errors
    ///
    /// `Error::Configuration` when no bound is configured and the codec
    /// accepts no strength at all for this field order
    pub fn strengths(&self) -> Result<RangeInclusive<usize>> {
        let max = match self.config.max_strength {
            Some(max) => max,
            None => CodecAdapter::max_strength(self.config.field_order).ok_or_else(|| {
                Error::Configuration(format!(
                    "no constructible strength for field order {}",
                    self.config.field_order
                ))
            })?,
        };
        Ok(1..=max)
    }

    /// Run every strength in turn. Configuration failures and trial faults
    /// are recorded, never propagated.
    pub fn run(&self) -> Result<SweepResult> {
        let strengths = self.strengths()?;
        let seed = resolve_seed(self.config.seed);

        info!(
            "sweep m={} t={}..={} model={} delta={} trials={} seed={}",
            self.config.field_order,
            strengths.start(),
            strengths.end(),
            self.config.model,
            self.config.delta,
            self.config.trials,
            seed
        );

        let mut result = SweepResult::new(seed);
        for strength in strengths {
            result.push(self.run_strength(strength, seed))?;
        }
        Ok(result)
    }

    /// Run all trials of a single strength
    pub fn run_strength(&self, strength: usize, seed: u64) -> StrengthOutcome {
        let config = CodecConfig::new(strength, self.config.field_order);
        let mut adapter = match CodecAdapter::new(config) {
            Ok(adapter) => adapter,
            Err(e) => {
                warn!("skipping {}: {}", config, e);
                return StrengthOutcome::unconstructible(strength, self.config.trials, e.to_string());
            }
        };

        let runner = TrialRunner::new(self.config.model, self.config.delta);
        let outcome = run_trials(
            &mut adapter,
            runner,
            self.config.trials,
            seed,
            self.config.parallel,
        );

        info!(
            "{}: {}/{} corrected (rate {:.4}, uncorrectable {}, miscorrected {}, faults {})",
            config,
            outcome.successes,
            outcome.trials,
            outcome.success_rate(),
            outcome.uncorrectable,
            outcome.miscorrected,
            outcome.faults
        );

        outcome
    }
}

/// Use `seed` or draw a fresh one
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| rand::thread_rng().gen())
}

/// Independent generator for one trial
pub fn trial_rng(seed: u64, strength: usize, trial: usize) -> ChaCha20Rng {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    rng.set_stream(((strength as u64) << 32) | trial as u64);
    rng
}

/// Run `trials` trials against `adapter` and aggregate them
pub fn run_trials<C>(
    adapter: &mut CodecAdapter<C>,
    runner: TrialRunner,
    trials: usize,
    seed: u64,
    parallel: bool,
) -> StrengthOutcome
where
    C: BlockCodec + Clone + Send + Sync,
{
    let strength = adapter.parameters().strength;

    let results: Vec<TrialResult> = if parallel {
        let shared: &CodecAdapter<C> = adapter;
        (0..trials)
            .into_par_iter()
            .map_init(
                || shared.clone(),
                |worker, trial| runner.execute(worker, &mut trial_rng(seed, strength, trial)),
            )
            .collect()
    } else {
        (0..trials)
            .map(|trial| runner.execute(&mut *adapter, &mut trial_rng(seed, strength, trial)))
            .collect()
    };

    let mut outcome = StrengthOutcome::new(strength);
    for (trial, result) in results.iter().enumerate() {
        if let Some(TrialFailure::Fault(reason)) = &result.failure {
            warn!(
                "trial {} (t={}, m={}, seed={}) raised: {}",
                trial,
                strength,
                adapter.parameters().field_order,
                seed,
                reason
            );
        }
        outcome.record(result);
    }
    outcome
}
