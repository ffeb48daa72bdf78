//! Stock delimiter families: braces, brackets, parens
//!
//! Registers the three common pairs with escape-aware close patterns
//! (`\}` is reported through the `suffix` capture and treated as literal
//! text), plus a `text` handler that consumes everything that is not a
//! delimiter. Escape sequences before non-delimiters are swallowed by the
//! text handler so that a backslash only reaches a close handler when it
//! actually precedes a close delimiter.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::capset::error::CaptureError;
use crate::capset::matcher::Pattern;
use crate::capset::node::Node;
use crate::capset::parser::{Capture, Parser, ParserState};

static BRACE_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\{").unwrap());
static BRACE_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?P<suffix>\\)?\}").unwrap());
static BRACKET_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[").unwrap());
static BRACKET_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?P<suffix>\\)?\]").unwrap());
static PAREN_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\(").unwrap());
static PAREN_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?P<suffix>\\)?\)").unwrap());

/// Anything that is not one of the six delimiters; a backslash is consumed
/// together with the following non-delimiter character (or alone at end of
/// input) so it cannot shadow an escaped close.
static TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[^{}\[\]()\\]|\\[^{}\[\]()]|\\\z)+").unwrap());

/// Register the `brace` pair (`{` / `}`)
pub fn register_brace(parser: &mut Parser) -> Result<(), CaptureError> {
    parser.capture_set(
        "brace",
        Pattern::Regex(BRACE_OPEN.clone()),
        Pattern::Regex(BRACE_CLOSE.clone()),
        None,
    )?;
    Ok(())
}

/// Register the `bracket` pair (`[` / `]`)
pub fn register_bracket(parser: &mut Parser) -> Result<(), CaptureError> {
    parser.capture_set(
        "bracket",
        Pattern::Regex(BRACKET_OPEN.clone()),
        Pattern::Regex(BRACKET_CLOSE.clone()),
        None,
    )?;
    Ok(())
}

/// Register the `paren` pair (`(` / `)`)
pub fn register_paren(parser: &mut Parser) -> Result<(), CaptureError> {
    parser.capture_set(
        "paren",
        Pattern::Regex(PAREN_OPEN.clone()),
        Pattern::Regex(PAREN_CLOSE.clone()),
        None,
    )?;
    Ok(())
}

/// Register a `text` handler for everything that is not a delimiter
pub fn register_text(parser: &mut Parser) {
    parser.set("text", |state: &mut ParserState| -> Result<Capture, CaptureError> {
        let start = state.position();
        let Some(info) = state.match_pattern(&Pattern::Regex(TEXT.clone())) else {
            return Ok(Capture::None);
        };
        let end = state.position();
        let prev = state.enclosing_node();
        let node = state.tree.push(Node::token("text", &info.text, start..end));
        state.tree.append_child(prev, node);
        Ok(Capture::Handled)
    });
}

/// Register all three stock pairs plus the `text` fallthrough handler
pub fn register_default_pairs(parser: &mut Parser) -> Result<(), CaptureError> {
    register_brace(parser)?;
    register_bracket(parser)?;
    register_paren(parser)?;
    register_text(parser);
    Ok(())
}
