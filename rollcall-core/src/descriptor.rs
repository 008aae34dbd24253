//! Face descriptor value object and its persisted text encoding.
//!
//! A descriptor is always exactly three 64-bit fingerprints, independent of
//! the input image size or format. It is created once per enrolled reference
//! image and once per verification attempt, and never mutated afterwards.
//!
//! The text form is what gets persisted next to an employee record, so it
//! must stay stable across processes and releases. Changing the encoding is
//! a breaking migration for every stored reference descriptor.

use serde::Deserialize;

use crate::error::{Result, RollcallError};

/// Current descriptor encoding version.
pub const DESCRIPTOR_VERSION: u8 = 1;

/// Combined three-hash fingerprint representing one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceDescriptor {
    /// Perceptual hash (DCT of the downsampled grayscale image)
    pub phash: u64,
    /// Average hash (grid cells against mean luminance)
    pub ahash: u64,
    /// Difference hash (horizontal neighbor comparison)
    pub dhash: u64,
}

/// Wire form of the descriptor text encoding.
///
/// Records written before the version tag was introduced carry only the
/// three hash fields; those decode as version 1.
#[derive(Deserialize)]
struct DescriptorRepr {
    #[serde(default = "default_version")]
    v: u8,
    phash: u64,
    ahash: u64,
    dhash: u64,
}

fn default_version() -> u8 {
    DESCRIPTOR_VERSION
}

impl FaceDescriptor {
    /// Encode to the persisted text form.
    pub fn encode(&self) -> String {
        serde_json::json!({
            "v": DESCRIPTOR_VERSION,
            "phash": self.phash,
            "ahash": self.ahash,
            "dhash": self.dhash,
        })
        .to_string()
    }

    /// Decode from the persisted text form.
    ///
    /// Fails with [`RollcallError::MalformedDescriptor`] when the text does
    /// not parse into exactly three 64-bit integer fields, or when it carries
    /// a version this build does not understand.
    pub fn decode(text: &str) -> Result<Self> {
        let repr: DescriptorRepr = serde_json::from_str(text).map_err(|e| {
            RollcallError::MalformedDescriptor(format!("Invalid descriptor text: {}", e))
        })?;

        if repr.v != DESCRIPTOR_VERSION {
            return Err(RollcallError::MalformedDescriptor(format!(
                "Unsupported descriptor version {} (current: {})",
                repr.v, DESCRIPTOR_VERSION
            )));
        }

        Ok(Self {
            phash: repr.phash,
            ahash: repr.ahash,
            dhash: repr.dhash,
        })
    }
}
