use std::fmt;
use thiserror::Error as ThisError;

///
/// ModelError
///
/// Build-time and finalized-model failures raised by the metadata subsystem.
/// Every variant is fatal to the edit in progress; nothing here is retried.
///

#[derive(Debug, ThisError)]
pub enum ModelError {
    #[error("setting base of '{entity}' to '{base}' would create a cycle")]
    Cycle { entity: String, base: String },

    #[error("model is finalized; '{operation}' is not allowed")]
    ModelFrozen { operation: &'static str },

    #[error("discriminator '{property}' of '{entity}' cannot change after save")]
    DiscriminatorWriteAfterSave { entity: String, property: String },

    #[error("property '{property}' of '{entity}' cannot change after save")]
    WriteAfterSave { entity: String, property: String },

    #[error("entity type '{0}' already exists")]
    DuplicateEntityType(String),

    #[error("entity type '{0}' not found")]
    UnknownEntityType(String),

    #[error("property '{0}' not found")]
    UnknownProperty(String),

    #[error("model is not finalized; '{operation}' requires a finalized model")]
    NotFinalized { operation: &'static str },

    #[error("entity type '{entity}' has no discriminator value for provider '{provider}'")]
    MissingDiscriminatorValue { entity: String, provider: String },

    #[error("convention dispatch exceeded max depth {max} while handling {event}")]
    DispatchDepthExceeded { max: usize, event: String },

    #[error("model validation failed: {0}")]
    Validation(ValidationErrors),
}

impl ModelError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Cycle { .. }
            | Self::DuplicateEntityType(_)
            | Self::DiscriminatorWriteAfterSave { .. }
            | Self::WriteAfterSave { .. } => ErrorClass::Conflict,
            Self::UnknownEntityType(_) | Self::UnknownProperty(_) => ErrorClass::NotFound,
            Self::ModelFrozen { .. } | Self::NotFinalized { .. } => ErrorClass::Unsupported,
            Self::MissingDiscriminatorValue { .. }
            | Self::DispatchDepthExceeded { .. }
            | Self::Validation(_) => ErrorClass::InvariantViolation,
        }
    }

    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::Cycle { .. }
            | Self::DuplicateEntityType(_)
            | Self::UnknownEntityType(_)
            | Self::UnknownProperty(_) => ErrorOrigin::Graph,
            Self::ModelFrozen { .. } => ErrorOrigin::Builder,
            Self::DispatchDepthExceeded { .. } => ErrorOrigin::Dispatch,
            Self::NotFinalized { .. } | Self::MissingDiscriminatorValue { .. } => {
                ErrorOrigin::Generator
            }
            Self::DiscriminatorWriteAfterSave { .. } | Self::WriteAfterSave { .. } => {
                ErrorOrigin::Save
            }
            Self::Validation(_) => ErrorOrigin::Finalize,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {self}", self.origin(), self.class())
    }
}

///
/// ValidationErrors
///
/// Aggregated finalize-time invariant violations.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ValidationErrors {
    messages: Vec<String>,
}

impl ValidationErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    pub fn add(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages.join("; "))
    }
}

impl From<ValidationErrors> for ModelError {
    fn from(errs: ValidationErrors) -> Self {
        Self::Validation(errs)
    }
}

///
/// ErrorClass
/// Internal error taxonomy for build-time classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Conflict,
    InvariantViolation,
    NotFound,
    Unsupported,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Conflict => "conflict",
            Self::InvariantViolation => "invariant_violation",
            Self::NotFound => "not_found",
            Self::Unsupported => "unsupported",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Subsystem that raised the error.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Builder,
    Graph,
    Dispatch,
    Generator,
    Save,
    Finalize,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Builder => "builder",
            Self::Graph => "graph",
            Self::Dispatch => "dispatch",
            Self::Generator => "generator",
            Self::Save => "save",
            Self::Finalize => "finalize",
        };
        write!(f, "{label}")
    }
}
