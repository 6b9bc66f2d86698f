//! Per-generation uniqueness tokens for variant file names.

use crate::task::domain::Resolution;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

const TOKEN_BYTES: usize = 16;

/// Derives a 32-hex-digit token from the source stem, the resolution and
/// the generation instant.
///
/// The token keeps repeated runs on the same source from overwriting each
/// other; it says nothing about the file content.
#[must_use]
pub fn generation_token(stem: &str, resolution: Resolution, at: DateTime<Utc>) -> String {
    let nanos = at
        .timestamp_nanos_opt()
        .unwrap_or_else(|| at.timestamp_micros());
    let digest = Sha256::digest(format!("{stem}_{resolution}_{nanos}").as_bytes());
    let prefix: Vec<u8> = digest.iter().copied().take(TOKEN_BYTES).collect();
    hex::encode(prefix)
}
