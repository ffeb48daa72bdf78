//! Error types for the capture engine
//!
//! Errors are split by when they occur:
//!
//! - `UnregisteredClose` and `InvalidPattern` are configuration errors,
//!   raised synchronously at registration time.
//! - `UnbalancedClose` and `NoMatchingHandler` are parse-time errors and
//!   unwind the current parse.
//!
//! Pattern-no-match is deliberately *not* an error: it is the normal
//! fallthrough signal that lets the dispatch loop try the next handler.

use std::fmt;

/// Errors that can occur while registering captures or parsing input
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureError {
    /// A `.close` registration was attempted for a kind with no `.open`
    UnregisteredClose(String),
    /// Strict policy: a close matched but nothing of its kind was open
    UnbalancedClose(String),
    /// A pattern failed to compile
    InvalidPattern(String),
    /// No registered handler consumed input at the given byte offset
    NoMatchingHandler { position: usize },
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::UnregisteredClose(kind) => {
                write!(f, "an `.open` handler is not registered for '{}'", kind)
            }
            CaptureError::UnbalancedClose(kind) => {
                write!(f, "missing opening '{}'", kind)
            }
            CaptureError::InvalidPattern(msg) => {
                write!(f, "invalid pattern: {}", msg)
            }
            CaptureError::NoMatchingHandler { position } => {
                write!(f, "no handler consumed input at byte {}", position)
            }
        }
    }
}

impl std::error::Error for CaptureError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_unregistered_close() {
        let err = CaptureError::UnregisteredClose("brace".to_string());
        assert_eq!(
            err.to_string(),
            "an `.open` handler is not registered for 'brace'"
        );
    }

    #[test]
    fn test_display_unbalanced_close() {
        let err = CaptureError::UnbalancedClose("paren".to_string());
        assert_eq!(err.to_string(), "missing opening 'paren'");
    }

    #[test]
    fn test_display_no_matching_handler() {
        let err = CaptureError::NoMatchingHandler { position: 7 };
        assert_eq!(err.to_string(), "no handler consumed input at byte 7");
    }
}
