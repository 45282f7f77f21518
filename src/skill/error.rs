//! Located parse errors and the breadcrumb trail threaded through every parser.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered list of parser-function names, innermost last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallPath(Vec<String>);

impl CallPath {
    pub fn root(name: &str) -> Self {
        Self(vec![name.to_string()])
    }

    /// New path one level deeper; `self` is left untouched so siblings share a prefix.
    pub fn push(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for CallPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" > "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParseErrorKind {
    /// Expected sentence shape absent.
    PatternMismatch,
    /// Captured substring is not part of a closed vocabulary.
    UnknownToken,
    /// A marker promised a sub-match that is not there.
    MissingCapture,
    /// A captured digit run does not fit its numeric type.
    InvalidNumber,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{kind:?} at [{path}] on '{target}': {message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub path: CallPath,
    pub target: String,
    pub message: String,
}

impl ParseError {
    pub fn new(
        kind: ParseErrorKind,
        path: &CallPath,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            path: path.clone(),
            target: target.into(),
            message: message.into(),
        }
    }

    pub fn mismatch(path: &CallPath, target: &str, message: impl Into<String>) -> Self {
        Self::new(ParseErrorKind::PatternMismatch, path, target, message)
    }

    pub fn unknown(path: &CallPath, target: &str, vocabulary: &str) -> Self {
        Self::new(
            ParseErrorKind::UnknownToken,
            path,
            target,
            format!("not a known {vocabulary}"),
        )
    }

    pub fn missing(path: &CallPath, target: &str, message: impl Into<String>) -> Self {
        Self::new(ParseErrorKind::MissingCapture, path, target, message)
    }

    pub fn invalid_number(path: &CallPath, target: &str, message: impl Into<String>) -> Self {
        Self::new(ParseErrorKind::InvalidNumber, path, target, message)
    }
}
