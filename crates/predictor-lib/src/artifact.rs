//! Model artifact persistence
//!
//! The trained predictor is stored as pretty-printed JSON with an
//! adjacent `.sha256` sidecar. Loading verifies the checksum when the
//! sidecar is present and rejects tampered or truncated artifacts.

use crate::error::{PredictorError, Result};
use crate::predictor::DelayPredictor;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Write the predictor and its checksum next to each other
pub fn save(predictor: &DelayPredictor, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let bytes = serde_json::to_vec_pretty(predictor)?;
    fs::write(path, &bytes)?;
    fs::write(checksum_path(path), sha256_hex(&bytes))?;

    info!(path = %path.display(), bytes = bytes.len(), "Model artifact saved");
    Ok(())
}

/// Load a predictor, verifying the checksum sidecar when present
pub fn load(path: impl AsRef<Path>) -> Result<DelayPredictor> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;

    let sidecar = checksum_path(path);
    if sidecar.exists() {
        let expected = fs::read_to_string(&sidecar)?.trim().to_string();
        let actual = sha256_hex(&bytes);
        if expected != actual {
            return Err(PredictorError::ChecksumMismatch { expected, actual });
        }
    }

    let predictor = serde_json::from_slice(&bytes)?;
    info!(path = %path.display(), "Model artifact loaded");
    Ok(predictor)
}

fn checksum_path(path: &Path) -> PathBuf {
    let mut os_string = path.as_os_str().to_os_string();
    os_string.push(".sha256");
    PathBuf::from(os_string)
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
