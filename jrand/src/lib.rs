//! Reimplementation of the linear congruential generator used by the legacy
//! Java server (`java.util.Random` semantics).
//!
//! Integer outputs are bit-identical to the reference platform for any seed.
//! Floating point outputs follow the same algorithm; `next_gaussian` depends
//! on the host `ln`/`sqrt`, so its low bits may differ from `StrictMath`.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

use thiserror::Error;

/// LCG multiplier, 40 bits.
const MULTIPLIER: u64 = 0x5DEECE66D;
/// LCG increment.
const INCREMENT: u64 = 0xB;
/// The register is 48 bits wide.
const STATE_MASK: u64 = (1 << 48) - 1;

const UNIQUIFIER_INIT: i64 = 8682522807148012;
const UNIQUIFIER_MULT: i64 = 181783497276652981;

/// Process-global seed uniquifier, consumed by every un-seeded construction.
static SEED_UNIQUIFIER: AtomicI64 = AtomicI64::new(UNIQUIFIER_INIT);

/// Returned by [`Random::next_int_bounded`] when the bound is not positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("bound must be positive (got {0})")]
pub struct BoundNotPositive(pub i32);

/// Advances the global uniquifier by one wrapping multiplication and returns
/// the new value. Concurrent callers each observe a distinct value.
fn seed_uniquifier() -> i64 {
    let mut current = SEED_UNIQUIFIER.load(Ordering::Relaxed);
    loop {
        let next = current.wrapping_mul(UNIQUIFIER_MULT);
        match SEED_UNIQUIFIER.compare_exchange_weak(
            current,
            next,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => return next,
            Err(observed) => current = observed,
        }
    }
}

/// Monotonic nanosecond counter, anchored at first use.
fn nano_time() -> i64 {
    static ORIGIN: OnceLock<Instant> = OnceLock::new();
    let origin = *ORIGIN.get_or_init(Instant::now);
    origin.elapsed().as_nanos() as i64
}

/// Deterministic 48-bit LCG matching the legacy server's generator.
///
/// A single instance is not safe for concurrent use; separate instances are
/// independent.
#[derive(Debug, Clone)]
pub struct Random {
    state: u64,
    next_gaussian: Option<f64>,
}

impl Random {
    /// Creates a generator from an explicit seed.
    pub fn new(seed: i64) -> Self {
        let mut random = Self {
            state: 0,
            next_gaussian: None,
        };
        random.set_seed(seed);
        random
    }

    /// Creates a generator seeded from the global uniquifier and the
    /// monotonic clock, so that repeated constructions diverge.
    pub fn from_entropy() -> Self {
        Self::new(seed_uniquifier() ^ nano_time())
    }

    /// Reseeds the generator and clears the cached Gaussian deviate.
    pub fn set_seed(&mut self, seed: i64) {
        self.state = (seed as u64 ^ MULTIPLIER) & STATE_MASK;
        self.next_gaussian = None;
    }

    // Core step: advance the register and return its top `bits` bits.
    // The high bits have the longest period.
    fn next(&mut self, bits: u32) -> i32 {
        debug_assert!((1..=32).contains(&bits));
        self.state = self
            .state
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(INCREMENT)
            & STATE_MASK;
        (self.state >> (48 - bits)) as i32
    }

    /// Fills `out` with pseudo-random bytes.
    ///
    /// One word of `next(32)` covers each 4-byte group, emitted low byte
    /// first; a final partial group draws one more word.
    pub fn next_bytes(&mut self, out: &mut [u8]) {
        let mut groups = out.chunks_exact_mut(4);
        for group in &mut groups {
            group.copy_from_slice(&self.next(32).to_le_bytes());
        }
        let tail = groups.into_remainder();
        if !tail.is_empty() {
            let mut word = self.next(32);
            for byte in tail {
                *byte = (word & 0xFF) as u8;
                word >>= 8;
            }
        }
    }

    /// Next 32-bit integer over the full range.
    pub fn next_int(&mut self) -> i32 {
        self.next(32)
    }

    /// Uniform integer in `[0, n)`.
    ///
    /// Powers of two take the top bits directly; other bounds use rejection
    /// sampling so the truncation-bias region is re-drawn.
    pub fn next_int_bounded(&mut self, n: i32) -> Result<i32, BoundNotPositive> {
        if n <= 0 {
            return Err(BoundNotPositive(n));
        }
        if (n & -n) == n {
            return Ok(((n as i64 * self.next(31) as i64) >> 31) as i32);
        }
        loop {
            let bits = self.next(31);
            let val = bits % n;
            // Overflows (goes negative) exactly when `bits` landed in the
            // biased partial interval at the top of the 31-bit range.
            if bits.wrapping_sub(val).wrapping_add(n - 1) >= 0 {
                return Ok(val);
            }
        }
    }

    /// Next 64-bit integer over the full range.
    pub fn next_long(&mut self) -> i64 {
        let hi = self.next(32) as i64;
        let lo = self.next(32) as i64;
        (hi << 32).wrapping_add(lo)
    }

    /// Next boolean.
    pub fn next_bool(&mut self) -> bool {
        self.next(1) != 0
    }

    /// Next single-precision float in `[0, 1)`.
    pub fn next_float(&mut self) -> f32 {
        self.next(24) as f32 / (1 << 24) as f32
    }

    /// Next double-precision float in `[0, 1)`.
    pub fn next_double(&mut self) -> f64 {
        let hi = self.next(26) as i64;
        let lo = self.next(27) as i64;
        ((hi << 27) + lo) as f64 / (1u64 << 53) as f64
    }

    /// Next normally distributed double (mean 0, standard deviation 1).
    ///
    /// Polar Box-Muller with rejection; the paired deviate is cached and
    /// returned by the following call.
    pub fn next_gaussian(&mut self) -> f64 {
        if let Some(cached) = self.next_gaussian.take() {
            return cached;
        }
        loop {
            let v1 = 2.0 * self.next_double() - 1.0;
            let v2 = 2.0 * self.next_double() - 1.0;
            let s = v1 * v1 + v2 * v2;
            if s < 1.0 && s != 0.0 {
                let norm = (-2.0 * s.ln() / s).sqrt();
                self.next_gaussian = Some(v2 * norm);
                return v1 * norm;
            }
        }
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference sequences below were captured from java.util.Random.

    #[test]
    fn seed_42_next_int_sequence() {
        let mut random = Random::new(42);
        let produced: Vec<i32> = (0..8).map(|_| random.next_int()).collect();
        assert_eq!(
            produced,
            [
                -1170105035,
                234785527,
                -1360544799,
                205897768,
                1325939940,
                -248792245,
                1190043011,
                -1255373459,
            ]
        );
    }

    #[test]
    fn set_seed_restarts_the_sequence() {
        let mut random = Random::new(1);
        random.next_int();
        random.set_seed(42);
        assert_eq!(random.next_int(), -1170105035);
        assert_eq!(random.next_int(), 234785527);
    }

    #[test]
    fn state_stays_within_48_bits() {
        let mut random = Random::new(-987654321);
        for _ in 0..1000 {
            random.next_long();
            assert!(random.state <= STATE_MASK);
        }
    }

    #[test]
    fn bounded_ints_stay_in_range() {
        let mut random = Random::new(99);
        for n in [1, 2, 3, 7, 10, 100, 1 << 30, i32::MAX] {
            for _ in 0..200 {
                let v = random.next_int_bounded(n).unwrap();
                assert!((0..n).contains(&v), "{v} out of [0, {n})");
            }
        }
    }

    #[test]
    fn bounded_ints_match_the_reference_histogram() {
        let mut random = Random::new(0);
        let produced: Vec<i32> = (0..100)
            .map(|_| random.next_int_bounded(10).unwrap())
            .collect();
        assert_eq!(
            produced,
            [
                0, 8, 9, 7, 5, 3, 1, 1, 9, 4, 7, 7, 3, 2, 5, 4, 4, 5, 1, 0, 3, 8, 4, 7, 2, 0,
                3, 2, 2, 3, 5, 5, 7, 7, 2, 2, 5, 3, 8, 5, 0, 5, 5, 0, 8, 1, 4, 6, 2, 2, 9, 7,
                6, 6, 7, 6, 8, 7, 3, 7, 7, 8, 5, 8, 8, 7, 1, 8, 8, 8, 8, 2, 7, 1, 6, 0, 7, 2,
                5, 0, 7, 3, 7, 9, 5, 2, 9, 3, 1, 1, 3, 0, 8, 4, 6, 3, 7, 2, 5, 1,
            ]
        );
    }

    #[test]
    fn power_of_two_bound_takes_top_bits() {
        for k in 0..=30u32 {
            let mut bounded = Random::new(7);
            let mut raw = Random::new(7);
            for _ in 0..16 {
                let expected = if k == 0 { 0 } else { raw.next(31) >> (31 - k) };
                if k == 0 {
                    raw.next(31);
                }
                assert_eq!(bounded.next_int_bounded(1 << k).unwrap(), expected);
            }
        }
    }

    #[test]
    fn non_positive_bound_is_rejected() {
        let mut random = Random::new(5);
        assert_eq!(random.next_int_bounded(0), Err(BoundNotPositive(0)));
        assert_eq!(random.next_int_bounded(-3), Err(BoundNotPositive(-3)));
    }

    #[test]
    fn seed_42_next_long_sequence() {
        let mut random = Random::new(42);
        let produced: Vec<i64> = (0..4).map(|_| random.next_long()).collect();
        assert_eq!(
            produced,
            [
                -5025562857975149833,
                -5843495416241995736,
                5694868678511409995,
                5111195811822994797,
            ]
        );
    }

    #[test]
    fn seed_42_next_bool_sequence() {
        let mut random = Random::new(42);
        let produced: Vec<bool> = (0..10).map(|_| random.next_bool()).collect();
        assert_eq!(
            produced,
            [true, false, true, false, false, true, false, true, true, false]
        );
    }

    #[test]
    fn next_bytes_partial_group_is_low_byte_first() {
        let mut random = Random::new(1);
        let mut out = [0u8; 7];
        random.next_bytes(&mut out);
        assert_eq!(out, [115, 213, 26, 187, 216, 156, 184]);
    }

    #[test]
    fn next_bytes_whole_groups() {
        let mut random = Random::new(1);
        let mut out = [0u8; 8];
        random.next_bytes(&mut out);
        assert_eq!(out, [115, 213, 26, 187, 216, 156, 184, 25]);

        let mut empty: [u8; 0] = [];
        random.next_bytes(&mut empty);
    }

    #[test]
    fn seed_42_next_float_sequence() {
        let mut random = Random::new(42);
        assert_eq!(random.next_float(), 0.7275636792182922);
        assert_eq!(random.next_float(), 0.054665207862854004);
        assert_eq!(random.next_float(), 0.6832234263420105);
        assert_eq!(random.next_float(), 0.047939300537109375);
    }

    #[test]
    fn seed_42_next_double_sequence() {
        let mut random = Random::new(42);
        assert_eq!(random.next_double(), 0.72756368003286809);
        assert_eq!(random.next_double(), 0.68322347175984544);
        assert_eq!(random.next_double(), 0.30871945533265976);
        assert_eq!(random.next_double(), 0.27707849007413665);
    }

    #[test]
    fn gaussian_pair_matches_the_reference() {
        let mut random = Random::new(42);
        let g1 = random.next_gaussian();
        let g2 = random.next_gaussian();
        // Host ln/sqrt, so allow a few ulps against the StrictMath values.
        assert!((g1 - 1.1419053154730547).abs() < 1e-9, "g1 = {g1}");
        assert!((g2 - 0.9194079489827879).abs() < 1e-9, "g2 = {g2}");
    }

    #[test]
    fn set_seed_clears_the_gaussian_cache() {
        let mut random = Random::new(42);
        let first = random.next_gaussian();
        random.set_seed(42);
        assert!(random.next_gaussian.is_none());
        assert_eq!(random.next_gaussian(), first);
    }

    #[test]
    fn uniquifier_advances_per_call() {
        assert_ne!(seed_uniquifier(), seed_uniquifier());
    }

    #[test]
    fn entropy_seeded_generators_diverge() {
        let mut a = Random::from_entropy();
        let mut b = Random::default();
        let left: Vec<i32> = (0..4).map(|_| a.next_int()).collect();
        let right: Vec<i32> = (0..4).map(|_| b.next_int()).collect();
        assert_ne!(left, right);
    }
}
