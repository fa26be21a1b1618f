use thiserror::Error;

/// Errors surfaced by the non-realtime paths of the crate.
///
/// Nothing on the render path returns these: malformed numeric data is
/// clamped where it is found and playback degrades to silence. Triggering
/// and device management report failures here as non-fatal warnings.
#[derive(Debug, Error)]
pub enum TactorError {
    #[error("no usable output device: {0}")]
    DeviceUnavailable(String),

    #[error("failed to build output stream: {0}")]
    StreamBuild(String),

    #[error("failed to control output stream: {0}")]
    StreamControl(String),

    #[error("pattern pack parse error: {0}")]
    PatternParse(#[from] serde_json::Error),

    #[error("unknown pattern '{0}'")]
    UnknownPattern(String),

    #[error("trigger for '{0}' rate limited")]
    RateLimited(String),

    #[error("output is reinitializing; trigger dropped")]
    Reinitializing,
}
