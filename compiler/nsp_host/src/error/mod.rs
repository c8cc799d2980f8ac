//! Host errors and their diagnostics.

use std::fmt;
use std::path::PathBuf;

use nsp_diagnostic::{Diagnostic, ErrorCode};
use nsp_engine::NamespaceError;

use crate::reader::{ReadError, ReadErrorKind};

/// Evaluation failure categories.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    VoidVariable { name: String },
    VoidFunction { name: String },
    WrongType { expected: &'static str, got: String },
    ArgCount { function: String, expected: usize, got: usize },
    Overflow { operation: &'static str },
    MalformedForm { form: String, reason: &'static str },
}

/// An evaluation error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
}

impl EvalError {
    pub fn code(&self) -> ErrorCode {
        match self.kind {
            EvalErrorKind::VoidVariable { .. } => ErrorCode::E3001,
            EvalErrorKind::VoidFunction { .. } => ErrorCode::E3002,
            EvalErrorKind::WrongType { .. } | EvalErrorKind::Overflow { .. } => ErrorCode::E3003,
            EvalErrorKind::ArgCount { .. } => ErrorCode::E3004,
            EvalErrorKind::MalformedForm { .. } => ErrorCode::E3005,
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            EvalErrorKind::VoidVariable { name } => write!(f, "symbol's value as variable is void: `{name}`"),
            EvalErrorKind::VoidFunction { name } => write!(f, "symbol's function definition is void: `{name}`"),
            EvalErrorKind::WrongType { expected, got } => {
                write!(f, "wrong type argument: expected {expected}, got {got}")
            }
            EvalErrorKind::ArgCount {
                function,
                expected,
                got,
            } => write!(f, "`{function}` takes {expected} argument(s), got {got}"),
            EvalErrorKind::Overflow { operation } => write!(f, "integer overflow in `{operation}`"),
            EvalErrorKind::MalformedForm { form, reason } => write!(f, "malformed `{form}`: {reason}"),
        }
    }
}

impl std::error::Error for EvalError {}

#[cold]
pub fn void_variable(name: &str) -> EvalError {
    EvalError {
        kind: EvalErrorKind::VoidVariable { name: name.to_owned() },
    }
}

#[cold]
pub fn void_function(name: &str) -> EvalError {
    EvalError {
        kind: EvalErrorKind::VoidFunction { name: name.to_owned() },
    }
}

#[cold]
pub fn wrong_type(expected: &'static str, got: impl Into<String>) -> EvalError {
    EvalError {
        kind: EvalErrorKind::WrongType {
            expected,
            got: got.into(),
        },
    }
}

#[cold]
pub fn arg_count(function: &str, expected: usize, got: usize) -> EvalError {
    EvalError {
        kind: EvalErrorKind::ArgCount {
            function: function.to_owned(),
            expected,
            got,
        },
    }
}

#[cold]
pub fn overflow(operation: &'static str) -> EvalError {
    EvalError {
        kind: EvalErrorKind::Overflow { operation },
    }
}

#[cold]
pub fn malformed(form: &str, reason: &'static str) -> EvalError {
    EvalError {
        kind: EvalErrorKind::MalformedForm {
            form: form.to_owned(),
            reason,
        },
    }
}

/// Anything that can go wrong while the host loads a unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostError {
    /// The unit's source is not well-formed.
    Read { unit: String, error: ReadError },
    /// A form failed to evaluate.
    Eval { unit: String, error: EvalError },
    /// The engine rejected a form.
    Namespace(NamespaceError),
    /// The unit file exists but could not be read.
    Unreadable { path: PathBuf, message: String },
}

impl HostError {
    pub fn code(&self) -> ErrorCode {
        match self {
            HostError::Read { error, .. } => match error.kind {
                ReadErrorKind::UnexpectedClose => ErrorCode::E1001,
                ReadErrorKind::UnclosedList | ReadErrorKind::MissingQuoted => ErrorCode::E1002,
                ReadErrorKind::UnterminatedString => ErrorCode::E1003,
                ReadErrorKind::BadDot => ErrorCode::E1004,
                ReadErrorKind::InvalidEscape(_) => ErrorCode::E1005,
            },
            HostError::Eval { error, .. } => error.code(),
            HostError::Namespace(error) => error.code(),
            HostError::Unreadable { .. } => ErrorCode::E3006,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            HostError::Namespace(error) => error.to_diagnostic(),
            HostError::Read { unit, error } => Diagnostic::error(self.code())
                .with_message(error.to_string())
                .with_note(format!("while reading unit `{unit}`")),
            HostError::Eval { unit, error } => Diagnostic::error(self.code())
                .with_message(error.to_string())
                .with_note(format!("while loading unit `{unit}`")),
            HostError::Unreadable { path, message } => Diagnostic::error(self.code())
                .with_message(format!("cannot read `{}`", path.display()))
                .with_note(message.clone()),
        }
    }

    /// The form this failure takes when it surfaces inside an import.
    pub fn into_namespace_error(self, unit: &str) -> NamespaceError {
        match self {
            HostError::Namespace(error) => error,
            other => NamespaceError::UnitLoadFailed {
                unit: unit.to_owned(),
                message: other.to_string(),
            },
        }
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::Read { unit, error } => write!(f, "{unit}: {error}"),
            HostError::Eval { unit, error } => write!(f, "{unit}: {error}"),
            HostError::Namespace(error) => write!(f, "{error}"),
            HostError::Unreadable { path, message } => {
                write!(f, "cannot read `{}`: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for HostError {}

impl From<NamespaceError> for HostError {
    fn from(error: NamespaceError) -> Self {
        HostError::Namespace(error)
    }
}
