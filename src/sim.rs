//! Monte Carlo simulation of block codec error correction.
//!
//! A trial encodes a random payload, corrupts the resulting packet with an
//! [`ErrorModel`], decodes and corrects it and checks the SHA-256 digest of
//! the packet against the original. Sweeps repeat trials for every strength
//! t of a field order m and export one success rate per strength.

pub mod adapter;
pub mod campaign;
pub mod export;
pub mod injector;
pub mod sweep;
pub mod trial;

// Re-export the types most callers need
pub use adapter::{CodecAdapter, CodecConfig, CodecParameters};
pub use campaign::{run_check, CampaignPlan, CheckConfig, CheckReport, PlanReport, SweepCampaign};
pub use export::{export, write_rates};
pub use injector::ErrorModel;
pub use sweep::{StrengthOutcome, SweepConfig, SweepExecutor, SweepResult};
pub use trial::{TrialFailure, TrialResult, TrialRunner};
