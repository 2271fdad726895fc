//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages.
//!
//! Errors raised by the rewrite engine are not tied to any source text; they describe mistakes
//! in the way a pattern or rule was authored. Each error kind provides a message and an optional
//! help text, and can be turned into an [`ariadne`] report by whatever front-end presents it.

use ariadne::{Color, Report, ReportKind};
use std::{any::Any, fmt::{self, Debug, Display}, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur during some operation.
///
/// This trait is usually implemented with `#[derive(ErrorKind)]` from the `cas-attrs` crate.
pub trait ErrorKind: Debug + Send + Sync {
    /// Returns `self` as [`Any`], so that the concrete error kind can be recovered.
    fn as_any(&self) -> &dyn Any;

    /// The message displayed at the top of the error.
    fn message(&self) -> String;

    /// Optional help text, describing what the user can do to fix the error.
    fn help(&self) -> Option<String> {
        None
    }

    /// Builds the report for this error.
    fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        let mut builder = Report::build(ReportKind::Error, src_id, 0)
            .with_message(self.message());
        if let Some(help) = self.help() {
            builder.set_help(help);
        }
        builder.finish()
    }
}

/// A type-erased error of some [`ErrorKind`].
#[derive(Debug)]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: impl ErrorKind + 'static) -> Self {
        Self { kind: Box::new(kind) }
    }

    /// Returns a reference to the error kind if it is of type `T`.
    pub fn downcast_ref<T: ErrorKind + 'static>(&self) -> Option<&T> {
        self.kind.as_any().downcast_ref::<T>()
    }

    /// Returns true if the error kind is of type `T`.
    pub fn is<T: ErrorKind + 'static>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.message())?;
        if let Some(help) = self.kind.help() {
            write!(f, " (help: {})", help)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

impl<K: ErrorKind + 'static> From<K> for Error {
    fn from(kind: K) -> Self {
        Self::new(kind)
    }
}
