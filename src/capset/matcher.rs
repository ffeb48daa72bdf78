//! Anchored pattern matching against the remaining input
//!
//! A `Pattern` is either a regex or an arbitrary predicate function. Both
//! are applied to the *remaining* input and only count as a match when they
//! match at offset zero and consume at least one byte; anything else is a
//! no-match, which the dispatch loop treats as "this handler does not apply
//! here" rather than an error.
//!
//! ## The `suffix` contract
//!
//! Escape detection reads a sub-capture from the match result: the capture
//! group named `suffix` if the pattern defines one, otherwise group 1.
//! A close pattern like `^(?P<suffix>\\)?\}` (or the positional form
//! `^(\\)?\}`) therefore reports the backslash that precedes an escaped
//! close delimiter.

use std::collections::HashMap;
use std::fmt;

use regex::Regex;

use crate::capset::error::CaptureError;

/// Structured result of a successful pattern match
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatchInfo {
    /// The full matched text (the consumed prefix of the input)
    pub text: String,
    /// Positional sub-captures, group 1 onward
    pub captures: Vec<Option<String>>,
    /// Named sub-captures that participated in the match
    pub named: HashMap<String, String>,
}

impl MatchInfo {
    /// A match consisting of just the matched text, no sub-captures
    pub fn of(text: &str) -> Self {
        MatchInfo {
            text: text.to_string(),
            captures: Vec::new(),
            named: HashMap::new(),
        }
    }

    /// The escape-detection sub-capture: named `suffix`, else group 1
    pub fn suffix(&self) -> Option<&str> {
        if let Some(named) = self.named.get("suffix") {
            return Some(named.as_str());
        }
        self.captures.first().and_then(|c| c.as_deref())
    }
}

/// An open/close pattern: a regex or an equivalent predicate function
pub enum Pattern {
    /// Regex applied to the remaining input; must match at offset zero
    Regex(Regex),
    /// Predicate returning the consumed prefix as a `MatchInfo`
    Func(Box<dyn Fn(&str) -> Option<MatchInfo>>),
}

impl Pattern {
    /// Compile a regex pattern
    pub fn regex(pattern: &str) -> Result<Self, CaptureError> {
        let regex =
            Regex::new(pattern).map_err(|e| CaptureError::InvalidPattern(e.to_string()))?;
        Ok(Pattern::Regex(regex))
    }

    /// Wrap a predicate function
    ///
    /// The function receives the remaining input and must return a
    /// `MatchInfo` whose `text` is a non-empty prefix of it.
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&str) -> Option<MatchInfo> + 'static,
    {
        Pattern::Func(Box::new(f))
    }

    /// Apply the pattern to the remaining input
    ///
    /// Returns `None` unless the pattern matches at offset zero and the
    /// matched text is non-empty.
    pub fn apply(&self, input: &str) -> Option<MatchInfo> {
        match self {
            Pattern::Regex(regex) => {
                let caps = regex.captures(input)?;
                let full = caps.get(0)?;
                if full.start() != 0 || full.as_str().is_empty() {
                    return None;
                }

                let captures = (1..caps.len())
                    .map(|i| caps.get(i).map(|m| m.as_str().to_string()))
                    .collect();

                let mut named = HashMap::new();
                for name in regex.capture_names().flatten() {
                    if let Some(m) = caps.name(name) {
                        named.insert(name.to_string(), m.as_str().to_string());
                    }
                }

                Some(MatchInfo {
                    text: full.as_str().to_string(),
                    captures,
                    named,
                })
            }
            Pattern::Func(f) => {
                let info = f(input)?;
                if info.text.is_empty() || !input.starts_with(&info.text) {
                    return None;
                }
                Some(info)
            }
        }
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Regex(regex) => write!(f, "Pattern::Regex({})", regex.as_str()),
            Pattern::Func(_) => write!(f, "Pattern::Func(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_match_at_start() {
        let pattern = Pattern::regex(r"^\{").unwrap();
        let info = pattern.apply("{abc").unwrap();
        assert_eq!(info.text, "{");
    }

    #[test]
    fn test_regex_no_match() {
        let pattern = Pattern::regex(r"^\{").unwrap();
        assert!(pattern.apply("abc{").is_none());
    }

    #[test]
    fn test_unanchored_regex_must_still_match_at_offset_zero() {
        // Without `^` the regex could match later in the buffer; that is
        // not a capture at the current position.
        let pattern = Pattern::regex(r"\{").unwrap();
        assert!(pattern.apply("ab{").is_none());
        assert!(pattern.apply("{ab").is_some());
    }

    #[test]
    fn test_empty_match_is_no_match() {
        let pattern = Pattern::regex(r"^a*").unwrap();
        assert!(pattern.apply("bbb").is_none());
    }

    #[test]
    fn test_positional_suffix_capture() {
        let pattern = Pattern::regex(r"^(\\)?\}").unwrap();
        let escaped = pattern.apply("\\}rest").unwrap();
        assert_eq!(escaped.text, "\\}");
        assert_eq!(escaped.suffix(), Some("\\"));

        let plain = pattern.apply("}rest").unwrap();
        assert_eq!(plain.text, "}");
        assert_eq!(plain.suffix(), None);
    }

    #[test]
    fn test_named_suffix_capture() {
        let pattern = Pattern::regex(r"^(?P<suffix>\\)?\]").unwrap();
        let escaped = pattern.apply("\\]x").unwrap();
        assert_eq!(escaped.suffix(), Some("\\"));
        assert_eq!(escaped.named.get("suffix").map(String::as_str), Some("\\"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Pattern::regex("(").unwrap_err();
        assert!(matches!(err, CaptureError::InvalidPattern(_)));
    }

    #[test]
    fn test_func_pattern() {
        let pattern = Pattern::func(|input| {
            if input.starts_with("<<") {
                Some(MatchInfo::of("<<"))
            } else {
                None
            }
        });
        assert_eq!(pattern.apply("<<x").unwrap().text, "<<");
        assert!(pattern.apply("x<<").is_none());
    }

    #[test]
    fn test_func_pattern_must_return_prefix() {
        // A predicate claiming text that is not a prefix of the input is
        // rejected rather than silently corrupting the scan position.
        let pattern = Pattern::func(|_| Some(MatchInfo::of("zzz")));
        assert!(pattern.apply("abc").is_none());
    }
}
