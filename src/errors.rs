//! The closed set of errors the front-end can produce. Each error carries a
//! [ErrorKind] tag, the [LocationRange] it happened at and an optional
//! override message that supersedes the kind's default at display time.

use std::fmt::Display;

use crate::location::LocationRange;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while resolving and reading a namespace.
/// The `#[error]` strings are the default human-readable messages.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("failed to load the namespace")]
    NsLoad,

    #[error("failed to add the namespace to the source manager")]
    NsAddToSourceManager,

    #[error("invalid number format")]
    InvalidDigitForNumber,

    #[error("invalid float number format")]
    TwoFloatPoints,

    #[error("invalid symbol format")]
    InvalidCharacterForSymbol,

    #[error("reached the end of the file while scanning for a list")]
    EofWhileScanningAList,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub kind: ErrorKind,
    pub location: LocationRange,
    pub message: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, location: LocationRange) -> Self {
        Self {
            kind,
            location,
            message: None,
        }
    }

    pub fn with_message(
        kind: ErrorKind,
        location: LocationRange,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            location,
            message: Some(message.into()),
        }
    }

    /// The override message if one was attached, the kind's default
    /// otherwise.
    pub fn message(&self) -> String {
        match &self.message {
            Some(msg) => msg.clone(),
            None => self.kind.to_string(),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location, self.message())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_message_comes_from_the_kind() {
        let err = Error::new(ErrorKind::TwoFloatPoints, LocationRange::unknown("user"));
        assert_eq!(err.message(), "invalid float number format");
        assert_eq!(err.to_string(), "<unknown>:0:0: invalid float number format");
    }

    #[test]
    fn override_message_supersedes_the_default() {
        let err = Error::with_message(
            ErrorKind::NsLoad,
            LocationRange::unknown("user"),
            "couldn't find namespace 'core'",
        );
        assert_eq!(err.message(), "couldn't find namespace 'core'");
    }
}
