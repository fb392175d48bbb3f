/// Result alias that carries the custom [`SoundwalkError`] type.
pub type Result<T> = std::result::Result<T, SoundwalkError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum SoundwalkError {
    /// A raster with zero width or height, or a pixel buffer whose length
    /// does not match the declared dimensions.
    #[error("sound map raster is unusable: {0}")]
    OutOfRange(String),
    /// The shared audio graph was denied by the platform. Fatal for the
    /// session; the usual cause is a missing user gesture that has to be
    /// re-requested rather than retried automatically.
    #[error("audio graph unavailable: {0}")]
    AudioGraphUnavailable(&'static str),
    /// A resource (sound map, source handle) was absent when an operation
    /// needed it. Safe to retry once the resource exists.
    #[error("missing resource: {0}")]
    MissingResource(&'static str),
    /// A configuration file that parsed but describes an impossible
    /// experience, or failed to parse at all.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Wrapper for plain-message failures surfaced by the application
    /// crate, e.g. image decoding.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl SoundwalkError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for SoundwalkError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for SoundwalkError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
