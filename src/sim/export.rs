//! Flat `strength,successRate` export of a sweep.

use crate::error::Result;
use crate::sim::sweep::SweepResult;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Plain decimal rendering of a rate, keeping `.0` on whole numbers
fn format_rate(rate: f64) -> String {
    if rate.fract() == 0.0 {
        format!("{:.1}", rate)
    } else {
        rate.to_string()
    }
}

/// Write one `strength,rate` line per row, no header, increasing strength
pub fn write_rates<W: Write>(writer: &mut W, result: &SweepResult) -> std::io::Result<()> {
    for (strength, rate) in result.rates() {
        writeln!(writer, "{},{}", strength, format_rate(rate))?;
    }
    Ok(())
}

/// Write `result` to `destination`, replacing any previous content.
///
/// # Errors
///
/// `Error::Io` if the file cannot be created or written
pub fn export<P: AsRef<Path>>(destination: P, result: &SweepResult) -> Result<()> {
    let destination = destination.as_ref();
    let mut writer = BufWriter::new(File::create(destination)?);
    write_rates(&mut writer, result)?;
    writer.flush()?;

    info!("wrote {} rows to {}", result.len(), destination.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::sim::sweep::StrengthOutcome;

    fn sample() -> SweepResult {
        let mut result = SweepResult::new(0);
        result.push(StrengthOutcome::from_counts(1, 4, 4)).unwrap();
        result.push(StrengthOutcome::from_counts(2, 4, 4)).unwrap();
        result.push(StrengthOutcome::from_counts(3, 4, 2)).unwrap();
        result
    }

    #[test]
    fn test_write_rates_format() {
        let mut out = Vec::new();
        write_rates(&mut out, &sample()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1,1.0\n2,1.0\n3,0.5\n");
    }

    #[test]
    fn test_zero_rate_and_empty() {
        let mut result = SweepResult::new(0);
        result.push(StrengthOutcome::from_counts(5, 10, 0)).unwrap();
        let mut out = Vec::new();
        write_rates(&mut out, &result).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "5,0.0\n");

        let mut out = Vec::new();
        write_rates(&mut out, &SweepResult::new(0)).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_small_rates_stay_decimal() {
        let mut result = SweepResult::new(0);
        result.push(StrengthOutcome::from_counts(1, 100_000, 1)).unwrap();
        result.push(StrengthOutcome::from_counts(2, 3, 1)).unwrap();
        let mut out = Vec::new();
        write_rates(&mut out, &result).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.lines().next(), Some("1,0.00001"));
        assert!(!text.contains('e'));
        assert_eq!(format_rate(1.0), "1.0");
        assert_eq!(format_rate(0.0), "0.0");
    }

    #[test]
    fn test_export_overwrites() {
        let path = std::env::temp_dir().join(format!("bchsim-export-{}.csv", std::process::id()));
        std::fs::write(&path, "stale content that is longer than the export\n").unwrap();

        export(&path, &sample()).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(written, "1,1.0\n2,1.0\n3,0.5\n");
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let path = std::env::temp_dir()
            .join("bchsim-no-such-dir")
            .join("nested")
            .join("out.csv");
        assert!(matches!(export(&path, &sample()), Err(Error::Io(_))));
    }
}
