//! Errors that can occur while expanding patterns.
//!
//! Matching and simplification never fail on their own; every error originates in the pattern
//! expander and propagates unchanged to the caller.

use ariadne::Fmt;
use cas_attrs::ErrorKind;
use cas_error::{ErrorKind, EXPR};

/// Expanding a pattern recursed deeper than the configured limit.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("pattern expansion exceeded the maximum depth of {}", self.max_depth),
    help = format!(
        "the pattern is nested {} levels deep; raise {} or flatten the pattern",
        self.depth,
        "max_depth".fg(EXPR),
    ),
)]
pub struct MaxDepthExceeded {
    /// The depth at which expansion was attempted.
    pub depth: usize,

    /// The configured maximum depth.
    pub max_depth: usize,
}

/// A pattern could not be turned into an expansion cache key.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("could not build a cache key for the pattern: {}", self.reason),
    help = format!(
        "give every predicate a name with {}, or disable the expansion cache",
        "Predicate::named".fg(EXPR),
    ),
)]
pub struct CacheError {
    /// Why serialization failed.
    pub reason: String,
}
