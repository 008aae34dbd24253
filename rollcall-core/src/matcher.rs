//! Similarity scoring and the verification decision.
//!
//! Descriptors are compared field-by-field with Hamming distance, averaged,
//! and inverted into a bounded similarity score. The verifier combines
//! extraction and comparison against a fixed acceptance threshold.

use crate::descriptor::FaceDescriptor;
use crate::error::Result;
use crate::hasher::FaceHasher;

/// Acceptance threshold used when the deployment does not configure one.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.6;

/// Bits per hash field; per-field Hamming distances range over [0, 64].
const HASH_BITS: f64 = 64.0;

/// Count of differing bits between two 64-bit hashes.
pub fn hamming_distance(a: u64, b: u64) -> u32 {
    (a ^ b).count_ones()
}

/// Bounded similarity score in [0.0, 1.0] for two descriptors.
///
/// Averages the three per-field Hamming distances and inverts:
/// `1 - avg/64`. Zero differing bits scores 1.0; all 192 differing bits
/// score 0.0. The clamp cannot trigger with this formula (the average is
/// always within [0, 64]) but is kept so a future formula change cannot
/// leak an out-of-range score.
pub fn similarity(a: &FaceDescriptor, b: &FaceDescriptor) -> f64 {
    let total = hamming_distance(a.phash, b.phash)
        + hamming_distance(a.ahash, b.ahash)
        + hamming_distance(a.dhash, b.dhash);
    let avg_distance = f64::from(total) / 3.0;

    (1.0 - avg_distance / HASH_BITS).clamp(0.0, 1.0)
}

/// Score two descriptors in their persisted text form.
///
/// Fails with [`crate::RollcallError::MalformedDescriptor`] when either side
/// does not decode.
pub fn compare_encoded(a: &str, b: &str) -> Result<f64> {
    let a = FaceDescriptor::decode(a)?;
    let b = FaceDescriptor::decode(b)?;
    Ok(similarity(&a, &b))
}

/// Outcome of a verification attempt.
///
/// The raw score is returned even on a non-match so callers can record
/// confidence regardless of the decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOutcome {
    pub is_match: bool,
    pub score: f64,
}

/// Combines extraction and comparison against an acceptance threshold.
///
/// The threshold is explicit immutable configuration rather than ambient
/// process state, so the verifier stays testable in isolation.
pub struct FaceVerifier {
    hasher: FaceHasher,
    threshold: f64,
}

impl FaceVerifier {
    /// Create a verifier with the given acceptance threshold.
    ///
    /// The threshold is clamped into [0.0, 1.0].
    pub fn new(threshold: f64) -> Self {
        Self {
            hasher: FaceHasher::new(),
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    /// The configured acceptance threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Verify candidate image bytes against a stored reference descriptor.
    ///
    /// A score exactly equal to the threshold counts as a match. Extraction
    /// and decoding failures are terminal for the attempt and surface to the
    /// caller; they are never folded into `is_match = false`, which would
    /// make a system failure indistinguishable from a legitimate rejection
    /// in the attendance record.
    pub fn verify_bytes(&self, candidate: &[u8], reference: &str) -> Result<MatchOutcome> {
        let candidate = self.hasher.extract_bytes(candidate)?;
        let reference = FaceDescriptor::decode(reference)?;
        let score = similarity(&candidate, &reference);

        Ok(MatchOutcome {
            is_match: score >= self.threshold,
            score,
        })
    }

    /// Enrollment flow: extract a fresh descriptor from reference image
    /// bytes and return it encoded, ready for persistence by the caller.
    pub fn enroll_bytes(&self, data: &[u8]) -> Result<String> {
        Ok(self.hasher.extract_bytes(data)?.encode())
    }
}

impl Default for FaceVerifier {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RollcallError;

    fn descriptor(phash: u64, ahash: u64, dhash: u64) -> FaceDescriptor {
        FaceDescriptor {
            phash,
            ahash,
            dhash,
        }
    }

    #[test]
    fn test_hamming_distance() {
        assert_eq!(hamming_distance(0, 0), 0);
        assert_eq!(hamming_distance(0, 1), 1);
        assert_eq!(hamming_distance(0, u64::MAX), 64);
        assert_eq!(hamming_distance(0b1010, 0b0101), 4);
    }

    #[test]
    fn test_similarity_is_reflexive() {
        let d = descriptor(0xDEAD_BEEF_CAFE_BABE, 0x0123_4567_89AB_CDEF, 42);
        assert_eq!(similarity(&d, &d), 1.0);
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let a = descriptor(0xFF00_FF00_FF00_FF00, 0x1234, u64::MAX);
        let b = descriptor(0x00FF_00FF_00FF_00FF, 0x4321, 0);
        assert_eq!(similarity(&a, &b), similarity(&b, &a));
    }

    #[test]
    fn test_one_differing_bit_per_field() {
        let a = descriptor(0, 0, 0);
        let b = descriptor(1, 1, 1);
        // avg distance = 1, score = 1 - 1/64
        assert_eq!(similarity(&a, &b), 0.984375);
    }

    #[test]
    fn test_all_bits_flipped_scores_zero() {
        let a = descriptor(0, 0, 0);
        let b = descriptor(u64::MAX, u64::MAX, u64::MAX);
        assert_eq!(similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_similarity_is_bounded() {
        let samples = [
            descriptor(0, 0, 0),
            descriptor(u64::MAX, u64::MAX, u64::MAX),
            descriptor(0xAAAA_AAAA_AAAA_AAAA, 0x5555_5555_5555_5555, 0xF0F0),
            descriptor(1, u64::MAX, 1 << 63),
        ];

        for a in &samples {
            for b in &samples {
                let score = similarity(a, b);
                assert!(score.is_finite());
                assert!((0.0..=1.0).contains(&score), "score {} out of range", score);
            }
        }
    }

    #[test]
    fn test_compare_encoded_roundtrip() {
        let a = descriptor(7, 7, 7);
        let score = compare_encoded(&a.encode(), &a.encode()).unwrap();
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_compare_encoded_rejects_corrupt_text() {
        let a = descriptor(7, 7, 7).encode();
        let err = compare_encoded(&a, "not-a-descriptor").unwrap_err();
        assert!(matches!(err, RollcallError::MalformedDescriptor(_)));
    }

    #[test]
    fn test_verifier_clamps_threshold() {
        assert_eq!(FaceVerifier::new(1.7).threshold(), 1.0);
        assert_eq!(FaceVerifier::new(-0.3).threshold(), 0.0);
        assert_eq!(FaceVerifier::default().threshold(), DEFAULT_SIMILARITY_THRESHOLD);
    }

    #[test]
    fn test_extraction_failure_precedes_reference_decode() {
        // Candidate extraction runs before the stored descriptor is decoded
        let verifier = FaceVerifier::default();
        let err = verifier.verify_bytes(b"junk", "{broken").unwrap_err();
        assert!(matches!(err, RollcallError::ExtractionError(_)));
    }
}
