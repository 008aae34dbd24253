//! Rollcall Core - image fingerprint engine for face check-in
//!
//! This crate provides the similarity-matching primitives behind the
//! attendance service: descriptor extraction, the persisted descriptor
//! encoding, Hamming-distance scoring, and the verification decision.
//!
//! # Scope
//!
//! The engine is deliberately honest about what it is: an approximate
//! whole-image similarity detector built from three perceptual hash
//! families (perceptual, average, difference). It is a stand-in for a
//! production face-recognition service and does no face detection,
//! landmark alignment, or deep embedding.
//!
//! # Example
//!
//! ```no_run
//! use rollcall_core::{FaceVerifier, DEFAULT_SIMILARITY_THRESHOLD};
//!
//! # fn example() -> rollcall_core::Result<()> {
//! let verifier = FaceVerifier::new(DEFAULT_SIMILARITY_THRESHOLD);
//!
//! // Enroll a reference photo once; persist the encoded descriptor
//! let reference = std::fs::read("reference.jpg").unwrap();
//! let stored = verifier.enroll_bytes(&reference)?;
//!
//! // Later, verify a submitted selfie against it
//! let selfie = std::fs::read("selfie.jpg").unwrap();
//! let outcome = verifier.verify_bytes(&selfie, &stored)?;
//! println!("match={} score={:.4}", outcome.is_match, outcome.score);
//! # Ok(())
//! # }
//! ```

pub mod descriptor;
pub mod error;
pub mod hasher;
pub mod matcher;

// Re-export main types for convenience
pub use descriptor::{FaceDescriptor, DESCRIPTOR_VERSION};
pub use error::{Result, RollcallError};
pub use hasher::FaceHasher;
pub use matcher::{
    compare_encoded, hamming_distance, similarity, FaceVerifier, MatchOutcome,
    DEFAULT_SIMILARITY_THRESHOLD,
};

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn encode_png(image: &DynamicImage) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        image
            .write_to(&mut buffer, ImageFormat::Png)
            .expect("Failed to encode test image");
        buffer.into_inner()
    }

    /// A synthetic photo with enough structure that the three hash
    /// families produce non-trivial values.
    fn sample_photo() -> Vec<u8> {
        let image = RgbImage::from_fn(96, 96, |x, y| {
            Rgb([
                (x as u8).wrapping_mul(3),
                (y as u8).wrapping_mul(2),
                ((x + y) as u8).wrapping_mul(5),
            ])
        });
        encode_png(&DynamicImage::ImageRgb8(image))
    }

    /// Integration test: enroll a reference photo, then verify the same
    /// photo through the full flow.
    #[test]
    fn test_full_checkin_workflow() {
        let verifier = FaceVerifier::new(DEFAULT_SIMILARITY_THRESHOLD);
        let photo = sample_photo();

        let stored = verifier.enroll_bytes(&photo).expect("Failed to enroll");
        let outcome = verifier
            .verify_bytes(&photo, &stored)
            .expect("Failed to verify");

        assert!(outcome.is_match, "identical image must match");
        assert_eq!(outcome.score, 1.0);
    }

    #[test]
    fn test_extraction_is_deterministic_across_calls() {
        let hasher = FaceHasher::new();
        let photo = sample_photo();

        let first = hasher.extract_bytes(&photo).unwrap();
        for _ in 0..3 {
            assert_eq!(hasher.extract_bytes(&photo).unwrap(), first);
        }
    }

    #[test]
    fn test_descriptor_roundtrips_through_storage_form() {
        let hasher = FaceHasher::new();
        let descriptor = hasher.extract_bytes(&sample_photo()).unwrap();

        let restored = FaceDescriptor::decode(&descriptor.encode()).unwrap();
        assert_eq!(restored, descriptor);
    }

    #[test]
    fn test_score_equal_to_threshold_counts_as_match() {
        let photo = sample_photo();
        let hasher = FaceHasher::new();
        let extracted = hasher.extract_bytes(&photo).unwrap();

        // Flip exactly one bit in each field so the score lands exactly on
        // 1 - 1/64 against the extracted descriptor.
        let reference = FaceDescriptor {
            phash: extracted.phash ^ 1,
            ahash: extracted.ahash ^ 1,
            dhash: extracted.dhash ^ 1,
        };
        let boundary = 1.0 - 1.0 / 64.0;

        let at_boundary = FaceVerifier::new(boundary)
            .verify_bytes(&photo, &reference.encode())
            .unwrap();
        assert_eq!(at_boundary.score, boundary);
        assert!(at_boundary.is_match, "score == threshold must match");

        let above_boundary = FaceVerifier::new(0.99)
            .verify_bytes(&photo, &reference.encode())
            .unwrap();
        assert_eq!(above_boundary.score, boundary);
        assert!(!above_boundary.is_match, "score < threshold must not match");
    }

    #[test]
    fn test_verify_rejects_undecodable_candidate() {
        let verifier = FaceVerifier::default();
        let reference = FaceHasher::new()
            .extract_bytes(&sample_photo())
            .unwrap()
            .encode();

        let err = verifier
            .verify_bytes(b"\x00\x01\x02 not an image", &reference)
            .unwrap_err();
        assert!(matches!(err, RollcallError::ExtractionError(_)));
    }

    #[test]
    fn test_verify_surfaces_corrupt_stored_descriptor() {
        // A corrupt reference must surface as an error, not score as a
        // non-match: the caller has to distinguish "could not evaluate"
        // from "evaluated and rejected".
        let verifier = FaceVerifier::default();
        let photo = sample_photo();

        let err = verifier
            .verify_bytes(&photo, "not-a-descriptor")
            .unwrap_err();
        assert!(matches!(err, RollcallError::MalformedDescriptor(_)));
    }

    #[test]
    fn test_similar_images_score_high() {
        // Re-encoding the same pixels as JPEG shifts bytes but the
        // fingerprint families are designed to survive it.
        let image = RgbImage::from_fn(96, 96, |x, y| {
            Rgb([
                (x as u8).wrapping_mul(3),
                (y as u8).wrapping_mul(2),
                ((x + y) as u8).wrapping_mul(5),
            ])
        });
        let dynamic = DynamicImage::ImageRgb8(image);

        let png = encode_png(&dynamic);
        let mut jpeg = Cursor::new(Vec::new());
        dynamic
            .write_to(&mut jpeg, ImageFormat::Jpeg)
            .expect("Failed to encode test image");

        let hasher = FaceHasher::new();
        let from_png = hasher.extract_bytes(&png).unwrap();
        let from_jpeg = hasher.extract_bytes(&jpeg.into_inner()).unwrap();

        let score = similarity(&from_png, &from_jpeg);
        assert!(
            score >= DEFAULT_SIMILARITY_THRESHOLD,
            "re-encoded image scored {}",
            score
        );
    }
}
