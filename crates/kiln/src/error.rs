use derive_more::Display;
use kiln_config::ConfigError;
use kiln_core::error::{ErrorClass, ErrorOrigin as CoreErrorOrigin, ModelError};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<ModelError> for Error {
    fn from(err: ModelError) -> Self {
        Self::new(
            ErrorKind::Model(err.class().into()),
            err.origin().into(),
            err.to_string(),
        )
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        let kind = match err {
            ConfigError::Io(_) => ConfigErrorKind::Io,
            ConfigError::Parse(_) => ConfigErrorKind::Parse,
            ConfigError::Invalid(_) => ConfigErrorKind::Invalid,
        };

        Self::new(ErrorKind::Config(kind), ErrorOrigin::Config, err.to_string())
    }
}

///
/// ErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    Model(ModelErrorKind),
    Config(ConfigErrorKind),
}

///
/// ModelErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ModelErrorKind {
    /// The edit contradicts existing state (cycles, duplicates, write-after-save).
    Conflict,

    /// A model invariant does not hold.
    InvariantViolation,

    /// Unknown entity type or property.
    NotFound,

    /// The operation is not allowed in the current phase.
    Unsupported,
}

impl From<ErrorClass> for ModelErrorKind {
    fn from(class: ErrorClass) -> Self {
        match class {
            ErrorClass::Conflict => Self::Conflict,
            ErrorClass::InvariantViolation => Self::InvariantViolation,
            ErrorClass::NotFound => Self::NotFound,
            ErrorClass::Unsupported => Self::Unsupported,
        }
    }
}

///
/// ConfigErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ConfigErrorKind {
    Io,
    Parse,
    Invalid,
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Builder,
    Config,
    Dispatch,
    Finalize,
    Generator,
    Graph,
    Save,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Builder => Self::Builder,
            CoreErrorOrigin::Graph => Self::Graph,
            CoreErrorOrigin::Dispatch => Self::Dispatch,
            CoreErrorOrigin::Generator => Self::Generator,
            CoreErrorOrigin::Save => Self::Save,
            CoreErrorOrigin::Finalize => Self::Finalize,
        }
    }
}
