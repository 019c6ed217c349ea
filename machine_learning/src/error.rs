use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

use crate::initialization::RandErr;

/// The result type used in the entire machine learning module.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The machine learning module's error type.
#[derive(Debug)]
pub enum MlErr {
    SizeMismatch {
        a: &'static str,
        b: &'static str,
        got: usize,
        expected: usize,
    },
    EmptyInput(&'static str),
    InvalidConfig(String),
    InvalidInit(String),
    ThreadPool(String),
    Io(io::Error),
    Parse(serde_json::Error),
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MlErr::SizeMismatch {
                a,
                b,
                got,
                expected,
            } => {
                format!(
                    "There's a size mismatch between {a} and {b}, got {got} and expected {expected}"
                )
            }
            MlErr::EmptyInput(what) => format!("The given {what} is empty"),
            MlErr::InvalidConfig(reason) => format!("Invalid training configuration: {reason}"),
            MlErr::InvalidInit(reason) => {
                format!("Failed to initialize the network parameters: {reason}")
            }
            MlErr::ThreadPool(reason) => format!("Failed to build the worker pool: {reason}"),
            MlErr::Io(e) => format!("io error: {e}"),
            MlErr::Parse(e) => format!("Failed to parse the configuration: {e}"),
        };

        write!(f, "{s}")
    }
}

impl Error for MlErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MlErr::Io(e) => Some(e),
            MlErr::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RandErr> for MlErr {
    fn from(value: RandErr) -> Self {
        Self::InvalidInit(value.to_string())
    }
}

impl From<io::Error> for MlErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for MlErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl From<rayon::ThreadPoolBuildError> for MlErr {
    fn from(value: rayon::ThreadPoolBuildError) -> Self {
        Self::ThreadPool(value.to_string())
    }
}

/// Boundary conversion for binaries / I/O APIs.
impl From<MlErr> for io::Error {
    fn from(value: MlErr) -> Self {
        match value {
            MlErr::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}
