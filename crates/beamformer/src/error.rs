use std::{fmt, path::PathBuf};

/// Everything that can abort a beamforming run.
#[derive(Debug)]
pub enum Error {
    /// Invalid geometry, propagation speed, sample rate or mismatched counts.
    Configuration(String),
    /// An input does not share the sample rate of the first input.
    InputMismatch {
        input: String,
        expected: u32,
        found: u32,
    },
    /// Reading an input or writing the output failed.
    Io { path: PathBuf, source: hound::Error },
    /// The combined signal is silent, so it can't be normalized.
    DegenerateSignal,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: impl Into<hound::Error>) -> Self {
        Self::Io {
            path: path.into(),
            source: source.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration(message) => write!(f, "invalid configuration: {message}"),
            Error::InputMismatch {
                input,
                expected,
                found,
            } => write!(
                f,
                "sample rate mismatch: {input} is {found} Hz, expected {expected} Hz"
            ),
            Error::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Error::DegenerateSignal => {
                write!(f, "combined signal is all zeros and can't be normalized")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
