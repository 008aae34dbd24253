//! Face fingerprint extraction.
//!
//! Computes three independent 64-bit fingerprints for a decoded image:
//!
//! - **Perceptual hash**: mean comparison over the low-frequency block of a
//!   DCT of the downsampled grayscale image. Robust to resizing and
//!   compression artifacts.
//! - **Average hash**: each cell of an 8x8 grayscale grid compared against
//!   the grid's mean luminance.
//! - **Difference hash**: each cell compared against its horizontal
//!   neighbor.
//!
//! This is approximate whole-image similarity, not biometric face
//! recognition: no face detection, no landmark alignment, no embeddings. It
//! stands in for a production face-recognition service and its accuracy
//! should not be oversold.

use image::DynamicImage;
use image_hasher::{HashAlg, Hasher, HasherConfig};

use crate::descriptor::FaceDescriptor;
use crate::error::{Result, RollcallError};

/// Downsampled grid edge length; every hash family yields exactly 64 bits.
const HASH_SIZE: u32 = 8;

/// Computes the three-hash fingerprint for an image.
///
/// Extraction is deterministic: identical input bytes always yield the
/// identical descriptor. No state is retained between calls, so a single
/// hasher is safe to share across concurrent verification requests.
pub struct FaceHasher {
    phash: Hasher<[u8; 8]>,
    ahash: Hasher<[u8; 8]>,
    dhash: Hasher<[u8; 8]>,
}

impl FaceHasher {
    pub fn new() -> Self {
        let phash = HasherConfig::with_bytes_type::<[u8; 8]>()
            .hash_size(HASH_SIZE, HASH_SIZE)
            .hash_alg(HashAlg::Mean)
            .preproc_dct()
            .to_hasher();

        let ahash = HasherConfig::with_bytes_type::<[u8; 8]>()
            .hash_size(HASH_SIZE, HASH_SIZE)
            .hash_alg(HashAlg::Mean)
            .to_hasher();

        let dhash = HasherConfig::with_bytes_type::<[u8; 8]>()
            .hash_size(HASH_SIZE, HASH_SIZE)
            .hash_alg(HashAlg::Gradient)
            .to_hasher();

        Self {
            phash,
            ahash,
            dhash,
        }
    }

    /// Extract a descriptor from raw image bytes (JPEG, PNG, GIF, or WebP).
    ///
    /// Fails with [`RollcallError::ExtractionError`] when the bytes do not
    /// decode as a supported image.
    pub fn extract_bytes(&self, data: &[u8]) -> Result<FaceDescriptor> {
        let image = image::load_from_memory(data).map_err(|e| {
            RollcallError::ExtractionError(format!("Failed to decode image: {}", e))
        })?;

        Ok(self.extract_image(&image))
    }

    /// Extract a descriptor from an already-decoded image.
    pub fn extract_image(&self, image: &DynamicImage) -> FaceDescriptor {
        let descriptor = FaceDescriptor {
            phash: hash64(&self.phash, image),
            ahash: hash64(&self.ahash, image),
            dhash: hash64(&self.dhash, image),
        };

        tracing::debug!(
            phash = %format!("{:016x}", descriptor.phash),
            ahash = %format!("{:016x}", descriptor.ahash),
            dhash = %format!("{:016x}", descriptor.dhash),
            "Extracted face descriptor"
        );

        descriptor
    }

    /// Check if the provided bytes appear to be a supported image format.
    pub fn is_supported_format(data: &[u8]) -> bool {
        image::guess_format(data).is_ok()
    }
}

impl Default for FaceHasher {
    fn default() -> Self {
        Self::new()
    }
}

fn hash64(hasher: &Hasher<[u8; 8]>, image: &DynamicImage) -> u64 {
    u64::from_be_bytes(hasher.hash_image(image).into_inner())
}
