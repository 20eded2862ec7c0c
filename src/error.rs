use std::fmt;

/// Errors from the non-real-time setup path. The render path never fails.
#[derive(Debug)]
pub enum SynthError {
    /// Configuration text was not valid JSON for [`SynthConfig`](crate::config::SynthConfig).
    Config(serde_json::Error),
    /// A configuration value that clamping cannot make meaningful.
    InvalidConfig { field: &'static str, reason: String },
    /// Writing an offline bounce failed.
    Wav(hound::Error),
}

impl fmt::Display for SynthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthError::Config(e) => write!(f, "Config error: {e}"),
            SynthError::InvalidConfig { field, reason } => {
                write!(f, "Invalid config value for '{field}': {reason}")
            }
            SynthError::Wav(e) => write!(f, "WAV error: {e}"),
        }
    }
}

impl std::error::Error for SynthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SynthError::Config(e) => Some(e),
            SynthError::Wav(e) => Some(e),
            SynthError::InvalidConfig { .. } => None,
        }
    }
}

impl From<serde_json::Error> for SynthError {
    fn from(e: serde_json::Error) -> Self {
        SynthError::Config(e)
    }
}

impl From<hound::Error> for SynthError {
    fn from(e: hound::Error) -> Self {
        SynthError::Wav(e)
    }
}
