use bchsim::sim::{
    write_rates, CodecAdapter, CodecConfig, ErrorModel, StrengthOutcome, SweepResult,
    TrialFailure, TrialRunner,
};
use bchsim::Result;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Flip bits of the packet, counting MSB-first from the start of the payload
fn flip(positions: &[usize]) -> impl FnOnce(&mut [u8]) -> Result<()> + '_ {
    move |packet| {
        for &position in positions {
            packet[position / 8] ^= 0x80 >> (position % 8);
        }
        Ok(())
    }
}

#[test]
fn test_two_errors_at_t2_restore_packet() {
    let mut adapter = CodecAdapter::new(CodecConfig::new(2, 9)).unwrap();
    assert_eq!(adapter.parameters().max_data_length_bytes, 60);
    let runner = TrialRunner::new(ErrorModel::Scattered, 0);

    // Both in the payload, straddling payload and ecc, both in the ecc
    for positions in [[3, 250], [0, 60 * 8 + 5], [60 * 8, 62 * 8 + 7]] {
        let result = runner.execute_with(&mut adapter, vec![0u8; 60], flip(&positions));
        assert_eq!(result.effective_errors, 2);
        assert_eq!(result.reported_errors, Some(2));
        assert!(result.success, "{:?} {:?}", positions, result);
    }
}

#[test]
fn test_three_errors_at_t2_complete_without_fault() {
    let mut adapter = CodecAdapter::new(CodecConfig::new(2, 9)).unwrap();
    let runner = TrialRunner::new(ErrorModel::Scattered, 1);
    let mut rng = ChaCha20Rng::seed_from_u64(2024);
    // Payload and parity bits only; a padding flip would leave two real errors
    let bits = 60 * 8 + adapter.parameters().ecc_bits;

    for _ in 0..100 {
        let positions = sample(&mut rng, bits, 3).into_vec();
        let result = runner.execute_with(&mut adapter, vec![0u8; 60], flip(&positions));

        assert_eq!(result.effective_errors, 3);
        assert!(!result.success);
        assert!(matches!(
            result.failure,
            Some(TrialFailure::Uncorrectable) | Some(TrialFailure::Miscorrected)
        ));
    }
}

#[test]
fn test_export_three_strengths() {
    let mut result = SweepResult::new(0);
    result.push(StrengthOutcome::from_counts(1, 2, 2)).unwrap();
    result.push(StrengthOutcome::from_counts(2, 2, 2)).unwrap();
    result.push(StrengthOutcome::from_counts(3, 2, 1)).unwrap();

    let mut out = Vec::new();
    write_rates(&mut out, &result).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().collect::<Vec<_>>(), vec!["1,1.0", "2,1.0", "3,0.5"]);
}

#[test]
fn test_up_to_t_distinct_errors_always_corrected() {
    let mut rng = ChaCha20Rng::seed_from_u64(77);

    for (m, t) in [(5, 2), (7, 5), (8, 9), (10, 12), (13, 3)] {
        let mut adapter = CodecAdapter::new(CodecConfig::new(t, m)).unwrap();
        let params = *adapter.parameters();
        let runner = TrialRunner::new(ErrorModel::Scattered, 0);

        for errors in 0..=t {
            for _ in 0..20 {
                let payload: Vec<u8> = (0..params.max_data_length_bytes)
                    .map(|_| rng.gen())
                    .collect();
                let positions = sample(&mut rng, params.packet_len() * 8, errors).into_vec();

                let result = runner.execute_with(&mut adapter, payload, flip(&positions));
                assert!(result.success, "m={} t={} {:?}", m, t, result);
                assert_eq!(result.reported_errors, Some(errors));
            }
        }
    }
}

#[test]
fn test_zero_injected_errors_always_succeed() {
    let mut rng = ChaCha20Rng::seed_from_u64(5);
    for model in [ErrorModel::Scattered, ErrorModel::Burst] {
        let mut adapter = CodecAdapter::new(CodecConfig::new(3, 9)).unwrap();
        let runner = TrialRunner::new(model, 0);
        let payload = vec![0xFFu8; adapter.parameters().max_data_length_bytes];
        let result = runner.execute_with(&mut adapter, payload, |packet| {
            model.inject(packet, 0, &mut rng)
        });
        assert!(result.success);
        assert_eq!(result.failure, None);
    }
}
