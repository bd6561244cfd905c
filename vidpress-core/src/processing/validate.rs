//! Stream-presence validation.

use crate::external::MediaBackend;
use std::path::Path;

/// True iff the file contains at least one video and one audio stream.
///
/// Corrupt or unreadable files are invalid, not an error; the probe is
/// re-run on every call, so repeated checks on an unchanged file agree.
pub fn validate_streams(backend: &dyn MediaBackend, input: &Path) -> bool {
    match backend.probe_streams(input) {
        Ok(summary) => summary.has_video && summary.has_audio,
        Err(e) => {
            log::debug!("Probe failed for {}: {e}", input.display());
            false
        }
    }
}
