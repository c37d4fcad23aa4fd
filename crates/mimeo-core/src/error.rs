//! Playback error taxonomy

use thiserror::Error;

/// Errors surfaced by the playback engine. None are retried.
///
/// `ClickFailed` is also broadcast as an `error` status event before
/// the run returns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// A run was requested while another one is active.
    #[error("Already playing")]
    AlreadyPlaying,
    /// No mouse backend exists for the host platform.
    #[error("macro playback is not supported on this platform")]
    UnsupportedPlatform,
    /// The mouse backend reported a dispatch failure. Fatal to the run;
    /// the remaining steps are abandoned.
    #[error("{0}")]
    ClickFailed(String),
}
