//! Campaigns: fixed-configuration checks and TOML campaign plans.
//!
//! A plan lists any number of sweeps, each exported to its own file, and
//! checks that hammer a single (t, m) configuration and report how many
//! trials failed.
//!
//! ```toml
//! seed = 42
//!
//! [[sweep]]
//! output = "m9_scattered.csv"
//! field_order = 9
//! trials = 500
//! model = "scattered"
//!
//! [[check]]
//! strength = 2
//! field_order = 9
//! trials = 10000
//! ```

use crate::error::{Error, Result};
use crate::sim::adapter::{CodecAdapter, CodecConfig, CodecParameters};
use crate::sim::export::export;
use crate::sim::injector::ErrorModel;
use crate::sim::sweep::{resolve_seed, run_trials, StrengthOutcome, SweepConfig, SweepExecutor, SweepResult};
use crate::sim::trial::TrialRunner;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

fn default_check_trials() -> usize {
    1000
}

/// Many trials of one fixed code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckConfig {
    pub strength: usize,
    pub field_order: usize,
    #[serde(default = "default_check_trials")]
    pub trials: usize,
    #[serde(default)]
    pub model: ErrorModel,
    #[serde(default)]
    pub delta: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub parallel: bool,
}

impl CheckConfig {
    pub fn new(strength: usize, field_order: usize, trials: usize) -> Self {
        Self {
            strength,
            field_order,
            trials,
            model: ErrorModel::default(),
            delta: 0,
            seed: None,
            parallel: false,
        }
    }
}

/// Result of a fixed-configuration check
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    pub codec: CodecParameters,
    pub seed: u64,
    pub outcome: StrengthOutcome,
}

impl Display for CheckReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let n = self.codec.codeword_length_bits;
        write!(
            f,
            "failed trials for BCH({}, {}) t={}: {}/{}",
            n,
            n - self.codec.ecc_bits,
            self.codec.strength,
            self.outcome.failures(),
            self.outcome.trials
        )
    }
}

/// Run `config.trials` trials against a single code
///
/// # Errors
///
/// `Error::Configuration` if the code cannot be built or no trials are requested
pub fn run_check(config: &CheckConfig) -> Result<CheckReport> {
    if config.trials == 0 {
        return Err(Error::Configuration(
            "trial count must be positive".to_string(),
        ));
    }

    let mut adapter = CodecAdapter::new(CodecConfig::new(config.strength, config.field_order))?;
    let seed = resolve_seed(config.seed);
    let runner = TrialRunner::new(config.model, config.delta);
    let outcome = run_trials(&mut adapter, runner, config.trials, seed, config.parallel);

    let report = CheckReport {
        codec: *adapter.parameters(),
        seed,
        outcome,
    };
    info!("{} (seed {})", report, seed);
    Ok(report)
}

/// One sweep of a plan and the file it is exported to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepCampaign {
    pub output: PathBuf,
    #[serde(flatten)]
    pub sweep: SweepConfig,
}

/// A list of sweeps and checks run back to back
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignPlan {
    /// Seed for every campaign that does not set its own
    pub seed: Option<u64>,
    #[serde(rename = "sweep")]
    pub sweeps: Vec<SweepCampaign>,
    #[serde(rename = "check")]
    pub checks: Vec<CheckConfig>,
}

/// Everything a plan produced
#[derive(Debug, Default)]
pub struct PlanReport {
    pub sweeps: Vec<(PathBuf, SweepResult)>,
    pub checks: Vec<CheckReport>,
}

impl CampaignPlan {
    /// Sweeps of both error models over GF(2^9), plus the BCH(511, 493) and
    /// GF(2^8), t = 15 checks
    pub fn standard() -> Self {
        let sweep = |model: ErrorModel, output: &str| SweepCampaign {
            output: PathBuf::from(output),
            sweep: SweepConfig {
                field_order: 9,
                model,
                ..SweepConfig::default()
            },
        };

        Self {
            seed: None,
            sweeps: vec![
                sweep(ErrorModel::Scattered, "bch_m9_scattered.csv"),
                sweep(ErrorModel::Burst, "bch_m9_burst.csv"),
            ],
            checks: vec![CheckConfig::new(2, 9, 10_000), CheckConfig::new(15, 8, 1000)],
        }
    }

    /// Parse a plan from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        let plan: Self = toml::from_str(text).map_err(|e| Error::Plan(e.to_string()))?;
        plan.validate()?;
        Ok(plan)
    }

    /// Read and parse a plan file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Plan(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sweeps.is_empty() && self.checks.is_empty() {
            return Err(Error::Plan("plan has no campaigns".to_string()));
        }
        for campaign in &self.sweeps {
            if campaign.output.as_os_str().is_empty() {
                return Err(Error::Plan("sweep without output path".to_string()));
            }
            campaign.sweep.validate()?;
        }
        for check in &self.checks {
            if check.trials == 0 {
                return Err(Error::Plan(format!(
                    "check t={} m={} has no trials",
                    check.strength, check.field_order
                )));
            }
        }
        Ok(())
    }

    /// Run every campaign in order.
    ///
    /// Sweeps and checks whose codes cannot be built are logged and
    /// skipped; only export failures abort the plan.
    pub fn run(&self) -> Result<PlanReport> {
        let mut report = PlanReport::default();

        for campaign in &self.sweeps {
            let mut config = campaign.sweep.clone();
            config.seed = config.seed.or(self.seed);

            let result = match SweepExecutor::new(config).and_then(|executor| executor.run()) {
                Ok(result) => result,
                Err(Error::Configuration(reason)) => {
                    warn!(
                        "skipping sweep to {}: {}",
                        campaign.output.display(),
                        reason
                    );
                    continue;
                }
                Err(e) => return Err(e),
            };
            export(&campaign.output, &result)?;
            report.sweeps.push((campaign.output.clone(), result));
        }

        for check in &self.checks {
            let mut check = check.clone();
            check.seed = check.seed.or(self.seed);

            match run_check(&check) {
                Ok(check_report) => report.checks.push(check_report),
                Err(Error::Configuration(reason)) => {
                    warn!(
                        "skipping check t={} m={}: {}",
                        check.strength, check.field_order, reason
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Ok(report)
    }
}
