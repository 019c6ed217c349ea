use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

use machine_learning::MlErr;

/// The data generation module's result type.
pub type Result<T> = std::result::Result<T, DataErr>;

/// The data generation module's error type.
#[derive(Debug)]
pub enum DataErr {
    InvalidConfig(String),
    InvalidAmplitude(f32),
    Ml(MlErr),
    Io(io::Error),
    Parse(serde_json::Error),
}

impl Display for DataErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataErr::InvalidConfig(reason) => {
                write!(f, "invalid generator configuration: {reason}")
            }
            DataErr::InvalidAmplitude(v) => write!(f, "amplitudes must be finite numbers, got {v}"),
            DataErr::Ml(e) => write!(f, "{e}"),
            DataErr::Io(e) => write!(f, "io error: {e}"),
            DataErr::Parse(e) => write!(f, "failed to parse the generator configuration: {e}"),
        }
    }
}

impl Error for DataErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DataErr::Ml(e) => Some(e),
            DataErr::Io(e) => Some(e),
            DataErr::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MlErr> for DataErr {
    fn from(value: MlErr) -> Self {
        Self::Ml(value)
    }
}

impl From<io::Error> for DataErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for DataErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Boundary conversion for binaries / I/O APIs.
impl From<DataErr> for io::Error {
    fn from(value: DataErr) -> Self {
        match value {
            DataErr::Io(e) => e,
            other @ DataErr::InvalidAmplitude(_) => io::Error::new(io::ErrorKind::InvalidInput, other),
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}
