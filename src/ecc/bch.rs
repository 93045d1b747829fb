//! BCH (Bose-Chaudhuri-Hocquenghem) error correction code implementation.
//!
//! Binary BCH codes over GF(2^m) correcting up to `t` bit errors per codeword.
//! The code is used in its shortened systematic form: a payload of at most
//! `floor(n / 8) - ecc_bytes` bytes is followed by `ecc_bits` parity bits
//! stored MSB-first in `ecc_bytes` bytes. The unused low bits of the last ecc
//! byte are always zero after encoding.
//!
//! Bit `j` of the concatenated `data || ecc` bit stream (MSB-first) is the
//! coefficient of `x^(L - 1 - j)` in the codeword polynomial, where `L` is the
//! number of payload bits plus `ecc_bits`.
//!
//! Decoding follows the usual pipeline:
//! - syndromes `S_1..S_2t` of the received polynomial
//! - Berlekamp-Massey for the error locator polynomial
//! - Chien search restricted to the shortened codeword
//!
//! Located bit positions are kept in the code instance until the next
//! `decode` call; [`BchCode::correct`] applies them.

use crate::ecc::{BlockCodec, DecodeStatus};
use crate::error::{Error, Result};
use bitvec::prelude::*;
use std::fmt::{Display, Formatter};

/// Smallest supported field order (m in GF(2^m))
pub const MIN_FIELD_ORDER: usize = 5;

/// Largest supported field order (m in GF(2^m))
pub const MAX_FIELD_ORDER: usize = 15;

/// Default primitive polynomials for m = 5..=15
const DEFAULT_PRIMITIVE_POLYS: [u32; MAX_FIELD_ORDER - MIN_FIELD_ORDER + 1] = [
    0x25,   // x^5 + x^2 + 1
    0x43,   // x^6 + x + 1
    0x83,   // x^7 + x + 1
    0x11d,  // x^8 + x^4 + x^3 + x^2 + 1
    0x211,  // x^9 + x^4 + 1
    0x409,  // x^10 + x^3 + 1
    0x805,  // x^11 + x^2 + 1
    0x1053, // x^12 + x^6 + x^4 + x + 1
    0x201b, // x^13 + x^4 + x^3 + x + 1
    0x402b, // x^14 + x^5 + x^3 + x + 1
    0x8003, // x^15 + x + 1
];

/// Binary BCH code with configurable correction capability
#[derive(Debug, Clone)]
pub struct BchCode {
    /// Field size parameter (m in GF(2^m))
    field_order: usize,
    /// Code length (n = 2^m - 1)
    code_length: usize,
    /// Maximum number of errors that can be corrected (t)
    error_correction_capability: usize,
    /// Generator polynomial coefficients, index = power of x
    generator_poly: Vec<bool>,
    /// Logarithm table for field operations
    log_table: Vec<usize>,
    /// Exponential table for field operations
    exp_table: Vec<usize>,
    /// Primitive polynomial used to define the field
    primitive_poly: u32,
    /// Bit positions in `data || ecc` located by the last decode
    error_locations: Vec<usize>,
    /// Payload length used by the last decode
    decoded_len: usize,
}

impl BchCode {
    /// Create a new BCH code with the specified parameters
    ///
    /// # Arguments
    ///
    /// * `field_order` - Field size parameter m (code works in GF(2^m))
    /// * `error_correction_capability` - Number of errors the code can correct (t)
    /// * `primitive_poly` - Optional primitive polynomial defining the field
    ///
    /// # Returns
    ///
    /// A new `BchCode` instance, or `Error::Configuration` when the pair
    /// (t, m) does not leave room for at least one payload byte
    pub fn new(
        field_order: usize,
        error_correction_capability: usize,
        primitive_poly: Option<u32>,
    ) -> Result<Self> {
        if !(MIN_FIELD_ORDER..=MAX_FIELD_ORDER).contains(&field_order) {
            return Err(Error::Configuration(format!(
                "field order must be between {} and {}, got {}",
                MIN_FIELD_ORDER, MAX_FIELD_ORDER, field_order
            )));
        }

        if error_correction_capability == 0 {
            return Err(Error::Configuration(
                "error correction capability must be positive".to_string(),
            ));
        }

        let code_length = (1 << field_order) - 1;
        if 2 * error_correction_capability >= code_length {
            return Err(Error::Configuration(format!(
                "error correction capability {} too large for n = {}",
                error_correction_capability, code_length
            )));
        }

        let prim_poly = primitive_poly
            .unwrap_or(DEFAULT_PRIMITIVE_POLYS[field_order - MIN_FIELD_ORDER]);
        if prim_poly >> field_order != 1 {
            return Err(Error::Configuration(format!(
                "polynomial {:#x} is not of degree {}",
                prim_poly, field_order
            )));
        }

        let (log_table, exp_table) = Self::generate_field_tables(field_order, prim_poly)?;

        let generator_poly = Self::generate_generator_polynomial(
            field_order,
            error_correction_capability,
            &log_table,
            &exp_table,
        );

        let generator_degree = generator_poly.len() - 1;
        if generator_degree >= code_length {
            return Err(Error::Configuration(format!(
                "generator polynomial degree ({}) must be less than code length ({})",
                generator_degree, code_length
            )));
        }

        let code = BchCode {
            field_order,
            code_length,
            error_correction_capability,
            generator_poly,
            log_table,
            exp_table,
            primitive_poly: prim_poly,
            error_locations: Vec::new(),
            decoded_len: 0,
        };

        if code.max_data_bytes() == 0 {
            return Err(Error::Configuration(format!(
                "t = {} leaves no payload bytes in GF(2^{})",
                error_correction_capability, field_order
            )));
        }

        Ok(code)
    }

    /// Get the code length (n)
    pub fn code_length(&self) -> usize {
        self.code_length
    }

    /// Get the field order (m)
    pub fn field_order(&self) -> usize {
        self.field_order
    }

    /// Get the error correction capability (t)
    pub fn error_correction_capability(&self) -> usize {
        self.error_correction_capability
    }

    /// Number of parity bits (degree of the generator polynomial)
    pub fn ecc_bits(&self) -> usize {
        self.generator_poly.len() - 1
    }

    /// Number of bytes holding the parity bits
    pub fn ecc_bytes(&self) -> usize {
        self.ecc_bits().div_ceil(8)
    }

    /// Longest payload, in bytes, that fits in one codeword
    pub fn max_data_bytes(&self) -> usize {
        (self.code_length / 8).saturating_sub(self.ecc_bytes())
    }

    /// Largest t that [`BchCode::new`] accepts for `field_order` with the
    /// default primitive polynomial, or `None` if even t = 1 is rejected.
    ///
    /// The generator degree is accumulated from cyclotomic coset sizes as t
    /// grows, so no field tables or generator polynomials are built.
    pub fn max_strength(field_order: usize) -> Option<usize> {
        if !(MIN_FIELD_ORDER..=MAX_FIELD_ORDER).contains(&field_order) {
            return None;
        }

        let n = (1 << field_order) - 1;
        let mut covered = vec![false; n];
        let mut degree = 0;
        let mut best = None;

        for t in 1.. {
            if 2 * t >= n {
                break;
            }

            let i = 2 * t - 1;
            if !covered[i] {
                let coset = Self::compute_cyclotomic_coset(i, field_order);
                for &j in &coset {
                    covered[j] = true;
                }
                degree += coset.len();
            }

            // Degree never shrinks, so the first t without payload room ends the scan
            if degree >= n || n / 8 <= degree.div_ceil(8) {
                break;
            }
            best = Some(t);
        }

        best
    }

    /// Primitive polynomial defining GF(2^m)
    pub fn primitive_poly(&self) -> u32 {
        self.primitive_poly
    }

    /// Compute the ecc bytes of `data`
    ///
    /// # Arguments
    ///
    /// * `data` - Payload of at most `max_data_bytes()` bytes
    ///
    /// # Returns
    ///
    /// `ecc_bytes()` bytes of parity, or an error if the payload is too long
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        if data.len() > self.max_data_bytes() {
            return Err(Error::InputTooLarge {
                length: data.len(),
                max_length: self.max_data_bytes(),
            });
        }

        let parity = self.calculate_parity(data);

        let mut ecc = bitvec![u8, Msb0; 0; self.ecc_bytes() * 8];
        for (i, &bit) in parity.iter().enumerate() {
            ecc.set(i, bit);
        }

        Ok(ecc.into_vec())
    }

    /// Locate bit errors in a received payload and its ecc
    ///
    /// # Arguments
    ///
    /// * `data` - Received payload; only the first `data_len` bytes are used
    /// * `ecc` - Received ecc bytes, exactly `ecc_bytes()` long
    /// * `data_len` - Payload length the ecc was computed over
    ///
    /// # Returns
    ///
    /// The number of located errors, or `DecodeStatus::Uncorrectable` when
    /// the error locator has no consistent set of roots. Set padding bits of
    /// the last ecc byte are reported as errors too.
    pub fn decode(&mut self, data: &[u8], ecc: &[u8], data_len: usize) -> Result<DecodeStatus> {
        self.error_locations.clear();
        self.decoded_len = data_len;

        if data_len > data.len() {
            return Err(Error::LengthMismatch {
                expected: data_len,
                actual: data.len(),
            });
        }

        if data_len > self.max_data_bytes() {
            return Err(Error::InputTooLarge {
                length: data_len,
                max_length: self.max_data_bytes(),
            });
        }

        if ecc.len() != self.ecc_bytes() {
            return Err(Error::LengthMismatch {
                expected: self.ecc_bytes(),
                actual: ecc.len(),
            });
        }

        let parity_bits = self.ecc_bits();
        let message_bits = data_len * 8;
        let codeword_bits = message_bits + parity_bits;

        let data_view = data[..data_len].view_bits::<Msb0>();
        let ecc_view = ecc.view_bits::<Msb0>();

        // Exponents of the non-zero coefficients of the received polynomial
        let exponents: Vec<usize> = data_view
            .iter_ones()
            .chain(ecc_view[..parity_bits].iter_ones().map(|i| i + message_bits))
            .map(|j| codeword_bits - 1 - j)
            .collect();

        let padding_errors = ecc_view[parity_bits..]
            .iter_ones()
            .map(|i| codeword_bits + i);

        let syndrome = self.calculate_syndrome(&exponents);

        let mut locations = Vec::new();
        if syndrome.iter().any(|&s| s != 0) {
            let error_locator = self.berlekamp_massey(&syndrome);

            match self.chien_search(&error_locator, codeword_bits) {
                Some(roots) => {
                    locations.extend(roots.into_iter().map(|p| codeword_bits - 1 - p));
                }
                None => return Ok(DecodeStatus::Uncorrectable),
            }
        }

        locations.extend(padding_errors);
        self.error_locations = locations;

        Ok(DecodeStatus::Correctable(self.error_locations.len()))
    }

    /// Flip the bits located by the last `decode` call
    ///
    /// Positions that fall outside the given buffers are skipped.
    pub fn correct(&self, data: &mut [u8], ecc: &mut [u8]) {
        let message_bits = self.decoded_len * 8;
        let data_view = data.view_bits_mut::<Msb0>();
        let ecc_view = ecc.view_bits_mut::<Msb0>();

        for &position in &self.error_locations {
            if position < message_bits {
                if position < data_view.len() {
                    let flipped = !data_view[position];
                    data_view.set(position, flipped);
                }
            } else {
                let position = position - message_bits;
                if position < ecc_view.len() {
                    let flipped = !ecc_view[position];
                    ecc_view.set(position, flipped);
                }
            }
        }
    }

    /// Remainder of `data(x) * x^r` divided by the generator polynomial,
    /// highest power first
    fn calculate_parity(&self, data: &[u8]) -> Vec<bool> {
        let r = self.ecc_bits();
        let mut remainder = vec![false; r];

        for bit in data.view_bits::<Msb0>().iter().by_vals() {
            let feedback = bit ^ remainder[0];
            for i in 0..r - 1 {
                remainder[i] = remainder[i + 1] ^ (feedback && self.generator_poly[r - 1 - i]);
            }
            remainder[r - 1] = feedback && self.generator_poly[0];
        }

        remainder
    }

    /// Syndromes S_1..S_2t of a received polynomial given by its exponents
    fn calculate_syndrome(&self, exponents: &[usize]) -> Vec<usize> {
        let count = 2 * self.error_correction_capability;
        let mut syndrome = vec![0; count];

        for i in 0..count {
            let power = i + 1;

            // S_2j = S_j^2 over GF(2^m)
            if power % 2 == 0 {
                let half = syndrome[power / 2 - 1];
                syndrome[i] = self.finite_field_mul(half, half);
                continue;
            }

            syndrome[i] = exponents.iter().fold(0, |acc, &p| {
                acc ^ self.exp_table[(p * power) % self.code_length]
            });
        }

        syndrome
    }

    /// Berlekamp-Massey algorithm for finding the error locator polynomial
    ///
    /// Returns the locator coefficients, lowest power first.
    fn berlekamp_massey(&self, syndrome: &[usize]) -> Vec<usize> {
        let mut locator = vec![0; syndrome.len() + 1];
        locator[0] = 1;
        let mut previous = locator.clone();

        let mut degree = 0;
        let mut shift = 1;
        let mut last_discrepancy = 1;

        for k in 0..syndrome.len() {
            let mut discrepancy = syndrome[k];
            for i in 1..=degree {
                discrepancy ^= self.finite_field_mul(locator[i], syndrome[k - i]);
            }

            if discrepancy == 0 {
                shift += 1;
                continue;
            }

            let scale = self.finite_field_div(discrepancy, last_discrepancy);
            let snapshot = locator.clone();
            for (i, &coefficient) in previous.iter().enumerate() {
                if i + shift < locator.len() {
                    locator[i + shift] ^= self.finite_field_mul(scale, coefficient);
                }
            }

            if 2 * degree <= k {
                degree = k + 1 - degree;
                previous = snapshot;
                last_discrepancy = discrepancy;
                shift = 1;
            } else {
                shift += 1;
            }
        }

        locator.truncate(degree + 1);
        locator
    }

    /// Chien search over the first `codeword_bits` positions
    ///
    /// Returns the exponents of the error positions, or `None` if the
    /// locator degree exceeds t or its roots are not all inside the
    /// shortened codeword.
    fn chien_search(&self, error_locator: &[usize], codeword_bits: usize) -> Option<Vec<usize>> {
        let degree = error_locator.len() - 1;
        if degree == 0 || degree > self.error_correction_capability || error_locator[degree] == 0 {
            return None;
        }

        let n = self.code_length;
        let mut roots = Vec::with_capacity(degree);

        for p in 0..codeword_bits {
            // Evaluate the locator at alpha^(-p)
            let mut sum = 0;
            for (i, &coefficient) in error_locator.iter().enumerate() {
                if coefficient == 0 {
                    continue;
                }
                let power = (self.log_table[coefficient] + n - (p * i) % n) % n;
                sum ^= self.exp_table[power];
            }

            if sum == 0 {
                roots.push(p);
                if roots.len() == degree {
                    break;
                }
            }
        }

        (roots.len() == degree).then_some(roots)
    }

    /// Generate tables for efficient field operations
    fn generate_field_tables(
        field_order: usize,
        primitive_poly: u32,
    ) -> Result<(Vec<usize>, Vec<usize>)> {
        let field_size = (1 << field_order) - 1;

        let mut log_table = vec![0; field_size + 1];
        let mut exp_table = vec![0; field_size];

        let mut x = 1;
        for i in 0..field_size {
            if i > 0 && x == 1 {
                return Err(Error::Configuration(format!(
                    "polynomial {:#x} is not primitive",
                    primitive_poly
                )));
            }

            exp_table[i] = x;
            log_table[x] = i;

            // Multiply by alpha, reducing by the primitive polynomial
            x <<= 1;
            if x & (1 << field_order) != 0 {
                x ^= primitive_poly as usize;
            }
        }

        if x != 1 {
            return Err(Error::Configuration(format!(
                "polynomial {:#x} is not primitive",
                primitive_poly
            )));
        }

        Ok((log_table, exp_table))
    }

    /// Compute the cyclotomic coset of i modulo 2^m-1
    fn compute_cyclotomic_coset(i: usize, m: usize) -> Vec<usize> {
        let n = (1 << m) - 1;
        let mut coset = Vec::new();
        let mut x = i;

        while !coset.contains(&x) {
            coset.push(x);
            x = (2 * x) % n;
        }

        coset
    }

    /// Minimal polynomial of alpha^i: product of (x - alpha^j) over its coset
    fn minimal_polynomial(coset: &[usize], log_table: &[usize], exp_table: &[usize]) -> Vec<bool> {
        let n = exp_table.len();
        let mut poly = vec![1];

        for &root in coset {
            let mut next = vec![0; poly.len() + 1];
            for (j, &coefficient) in poly.iter().enumerate() {
                next[j + 1] ^= coefficient;
                if coefficient != 0 {
                    next[j] ^= exp_table[(log_table[coefficient] + root) % n];
                }
            }
            poly = next;
        }

        // Coefficients of a minimal polynomial lie in GF(2)
        poly.into_iter().map(|c| c == 1).collect()
    }

    /// Generator polynomial: LCM of the minimal polynomials of alpha^1, alpha^3, ..., alpha^(2t-1)
    fn generate_generator_polynomial(
        field_order: usize,
        t: usize,
        log_table: &[usize],
        exp_table: &[usize],
    ) -> Vec<bool> {
        let n = (1 << field_order) - 1;
        let mut covered = vec![false; n];
        let mut generator = vec![true];

        for i in (1..2 * t).step_by(2) {
            if covered[i] {
                continue;
            }

            let coset = Self::compute_cyclotomic_coset(i, field_order);
            for &j in &coset {
                covered[j] = true;
            }

            let minimal = Self::minimal_polynomial(&coset, log_table, exp_table);
            generator = Self::binary_poly_multiply(&generator, &minimal);
        }

        generator
    }

    /// Multiply two binary polynomials
    fn binary_poly_multiply(a: &[bool], b: &[bool]) -> Vec<bool> {
        let mut result = vec![false; a.len() + b.len() - 1];

        for (i, &ai) in a.iter().enumerate() {
            if !ai {
                continue;
            }
            for (j, &bj) in b.iter().enumerate() {
                if bj {
                    result[i + j] ^= true;
                }
            }
        }

        result
    }

    /// Multiply two elements in the finite field
    fn finite_field_mul(&self, a: usize, b: usize) -> usize {
        if a == 0 || b == 0 {
            return 0;
        }

        let sum = (self.log_table[a] + self.log_table[b]) % self.code_length;
        self.exp_table[sum]
    }

    /// Divide `a` by the non-zero element `b`
    fn finite_field_div(&self, a: usize, b: usize) -> usize {
        if a == 0 {
            return 0;
        }

        let diff = (self.log_table[a] + self.code_length - self.log_table[b]) % self.code_length;
        self.exp_table[diff]
    }
}

impl BlockCodec for BchCode {
    fn field_order(&self) -> usize {
        self.field_order
    }

    fn strength(&self) -> usize {
        self.error_correction_capability
    }

    fn code_length(&self) -> usize {
        self.code_length
    }

    fn ecc_bits(&self) -> usize {
        BchCode::ecc_bits(self)
    }

    fn primitive_polynomial(&self) -> u32 {
        self.primitive_poly
    }

    fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        BchCode::encode(self, data)
    }

    fn decode(&mut self, data: &[u8], ecc: &[u8], data_len: usize) -> Result<DecodeStatus> {
        BchCode::decode(self, data, ecc, data_len)
    }

    fn correct(&self, data: &mut [u8], ecc: &mut [u8]) {
        BchCode::correct(self, data, ecc)
    }
}

impl Display for BchCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BCH(n={}, t={}, ecc_bits={}) over GF(2^{})",
            self.code_length,
            self.error_correction_capability,
            self.ecc_bits(),
            self.field_order
        )
    }
}

/// Create a BCH code with the default primitive polynomial
///
/// # Arguments
///
/// * `field_order` - Field size parameter m (code works in GF(2^m))
/// * `error_correction_capability` - Number of errors the code can correct (t)
pub fn create_bch_code(field_order: usize, error_correction_capability: usize) -> Result<BchCode> {
    BchCode::new(field_order, error_correction_capability, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flip(buf: &mut [u8], bit: usize) {
        buf[bit / 8] ^= 0x80 >> (bit % 8);
    }

    #[test]
    fn test_bch_code_creation() {
        let code = create_bch_code(9, 2).unwrap();
        assert_eq!(code.code_length(), 511);
        assert_eq!(code.error_correction_capability(), 2);
        assert_eq!(code.ecc_bits(), 18);
        assert_eq!(code.ecc_bytes(), 3);
        assert_eq!(code.max_data_bytes(), 60);
        assert_eq!(code.primitive_poly(), 0x211);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(create_bch_code(4, 1), Err(Error::Configuration(_))));
        assert!(matches!(create_bch_code(16, 1), Err(Error::Configuration(_))));
        assert!(matches!(create_bch_code(9, 0), Err(Error::Configuration(_))));
        // Parity would fill the whole codeword
        assert!(matches!(create_bch_code(9, 200), Err(Error::Configuration(_))));
        // x^5 + 1 is not primitive
        assert!(matches!(
            BchCode::new(5, 1, Some(0x21)),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_generator_degree_matches_cosets() {
        // Cosets of alpha and alpha^3 in GF(2^5) both have 5 elements
        let code = create_bch_code(5, 2).unwrap();
        assert_eq!(code.ecc_bits(), 10);
        assert_eq!(code.max_data_bytes(), 1);

        // In GF(2^8) the coset of alpha^17 has only 4 elements
        let code = create_bch_code(8, 9).unwrap();
        assert_eq!(code.ecc_bits(), 8 * 8 + 4);
    }

    #[test]
    fn test_max_strength_matches_construction() {
        for m in MIN_FIELD_ORDER..=9 {
            let max_t = BchCode::max_strength(m).unwrap();
            assert!(create_bch_code(m, max_t).is_ok(), "m={} t={}", m, max_t);
            assert!(create_bch_code(m, max_t + 1).is_err(), "m={} t={}", m, max_t + 1);
        }

        let max_t = BchCode::max_strength(12).unwrap();
        assert!(create_bch_code(12, max_t).unwrap().max_data_bytes() > 0);
        assert!(create_bch_code(12, max_t + 1).is_err());

        assert!(BchCode::max_strength(15).unwrap() > 1000);

        assert_eq!(BchCode::max_strength(4), None);
        assert_eq!(BchCode::max_strength(16), None);
    }

    #[test]
    fn test_encode_decode_no_errors() {
        let mut code = create_bch_code(9, 4).unwrap();
        let data: Vec<u8> = (0..code.max_data_bytes() as u8).collect();
        let ecc = code.encode(&data).unwrap();
        assert_eq!(ecc.len(), code.ecc_bytes());

        let status = code.decode(&data, &ecc, data.len()).unwrap();
        assert_eq!(status, DecodeStatus::Correctable(0));
    }

    #[test]
    fn test_encode_rejects_oversized_payload() {
        let code = create_bch_code(9, 2).unwrap();
        let data = vec![0u8; code.max_data_bytes() + 1];
        assert!(matches!(
            code.encode(&data),
            Err(Error::InputTooLarge { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_bad_ecc_length() {
        let mut code = create_bch_code(9, 2).unwrap();
        let data = vec![0u8; code.max_data_bytes()];
        let result = code.decode(&data, &[0u8; 2], data.len());
        assert!(matches!(
            result,
            Err(Error::LengthMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_correct_up_to_t_errors() {
        let mut code = create_bch_code(9, 3).unwrap();
        let original: Vec<u8> = (0..code.max_data_bytes()).map(|i| (i * 37) as u8).collect();
        let original_ecc = code.encode(&original).unwrap();

        let mut data = original.clone();
        let mut ecc = original_ecc.clone();
        flip(&mut data, 3);
        flip(&mut data, 200);
        flip(&mut ecc, 5);

        let status = code.decode(&data, &ecc, data.len()).unwrap();
        assert_eq!(status, DecodeStatus::Correctable(3));

        code.correct(&mut data, &mut ecc);
        assert_eq!(data, original);
        assert_eq!(ecc, original_ecc);
    }

    #[test]
    fn test_every_error_pair_small_code() {
        // 8 payload bits, 10 parity bits, 6 padding bits
        let mut code = create_bch_code(5, 2).unwrap();
        let original = vec![0xA5];
        let original_ecc = code.encode(&original).unwrap();
        let total_bits = 8 * (original.len() + original_ecc.len());

        for a in 0..total_bits {
            for b in (a + 1)..total_bits {
                let mut packet = original.clone();
                packet.extend_from_slice(&original_ecc);
                flip(&mut packet, a);
                flip(&mut packet, b);

                let (data, ecc) = packet.split_at_mut(original.len());
                let status = code.decode(data, ecc, 1).unwrap();
                assert_eq!(status, DecodeStatus::Correctable(2), "bits {} and {}", a, b);

                code.correct(data, ecc);
                assert_eq!(data, &original[..]);
                assert_eq!(ecc, &original_ecc[..]);
            }
        }
    }

    #[test]
    fn test_too_many_errors_does_not_panic() {
        let mut code = create_bch_code(9, 2).unwrap();
        let original = vec![0u8; code.max_data_bytes()];
        let ecc = code.encode(&original).unwrap();
        assert!(ecc.iter().all(|&b| b == 0));

        let mut data = original.clone();
        let mut ecc = ecc;
        flip(&mut data, 0);
        flip(&mut data, 100);
        flip(&mut data, 300);

        let status = code.decode(&data, &ecc, data.len()).unwrap();
        code.correct(&mut data, &mut ecc);

        // Either detected, or silently miscorrected into another codeword
        if status == DecodeStatus::Uncorrectable {
            assert_ne!(data, original);
        }
    }

    #[test]
    fn test_correct_after_failed_decode_is_noop() {
        let mut code = create_bch_code(5, 1).unwrap();
        let data = vec![0x3C, 0x00];
        let ecc = code.encode(&data[..code.max_data_bytes()]).unwrap();

        // Decoding a shorter buffer than requested fails before locating anything
        assert!(code.decode(&data[..1], &ecc, 2).is_err());

        let mut data_copy = data.clone();
        let mut ecc_copy = ecc.clone();
        code.correct(&mut data_copy, &mut ecc_copy);
        assert_eq!(data_copy, data);
        assert_eq!(ecc_copy, ecc);
    }

    #[test]
    fn test_finite_field_arithmetic() {
        let code = create_bch_code(8, 2).unwrap();

        for a in 1..=255 {
            let inverse = code.finite_field_div(1, a);
            assert_eq!(code.finite_field_mul(a, inverse), 1);
        }
        assert_eq!(code.finite_field_mul(0, 7), 0);
    }

    #[test]
    fn test_display() {
        let code = create_bch_code(9, 2).unwrap();
        assert_eq!(code.to_string(), "BCH(n=511, t=2, ecc_bits=18) over GF(2^9)");
    }
}
