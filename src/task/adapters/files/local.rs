//! Local path normalization against the managed input root.
//!
//! The containment rule is a heuristic, not a sandbox. A path is accepted
//! as-is when it starts with the input root or when it contains the input
//! root's directory name followed by a separator (`input/`). Anything else
//! is replaced by its file name under the input root. Absolute references
//! are not normalized, so `/srv/input/../etc/passwd` passes the check.

use crate::task::ports::{AcquisitionError, AcquisitionResult};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Normalizes `reference` to an absolute path associated with `input_root`.
///
/// Pure: the filesystem is never consulted, so resolving the same reference
/// twice yields the same path.
///
/// # Errors
///
/// Returns [`AcquisitionError::EmptyReference`] for blank input and
/// [`AcquisitionError::MissingFileName`] when the fallback needs a file name
/// and the reference has none.
pub fn normalize_local_reference(
    input_root: &Utf8Path,
    reference: &str,
) -> AcquisitionResult<Utf8PathBuf> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return Err(AcquisitionError::EmptyReference);
    }
    if trimmed.starts_with(input_root.as_str()) {
        return Ok(Utf8PathBuf::from(trimmed));
    }

    let requested = Utf8Path::new(trimmed);
    let candidate = if requested.is_absolute() {
        requested.to_path_buf()
    } else {
        normalize_lexically(&input_root.join(requested))
    };

    if mentions_root(input_root, &candidate) {
        return Ok(candidate);
    }

    let file_name = candidate
        .file_name()
        .ok_or_else(|| AcquisitionError::MissingFileName(trimmed.to_owned()))?;
    Ok(input_root.join(file_name))
}

fn mentions_root(input_root: &Utf8Path, candidate: &Utf8Path) -> bool {
    let marker = input_root.file_name().unwrap_or("input");
    let path = candidate.as_str();
    path.contains(&format!("{marker}/")) || path.contains(&format!("{marker}\\"))
}

/// Resolves `.` and `..` components without touching the filesystem.
fn normalize_lexically(path: &Utf8Path) -> Utf8PathBuf {
    let mut normalized = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_str()),
        }
    }
    normalized
}
