//! Error adapter for converting ConstellationError to miette diagnostics.
//!
//! This module provides the bridge between the library's error type and
//! miette's report formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic, LabeledSpan};

use constellation::ConstellationError;

/// Adapter giving a [`ConstellationError`] a diagnostic code and help text.
pub struct ErrorAdapter<'a>(pub &'a ConstellationError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl Diagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            ConstellationError::Io(_) => "constellation::io",
            ConstellationError::Config(_) => "constellation::config",
            ConstellationError::InvalidConfig(_) => "constellation::config::range",
            ConstellationError::UnknownEndpoint { .. } => "constellation::graph",
            ConstellationError::NonFinite { .. } => "constellation::numeric",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0 {
            ConstellationError::UnknownEndpoint { .. } => {
                "every edge endpoint must be listed under [[nodes]]"
            }
            ConstellationError::InvalidConfig(_) => {
                "check the layout configuration file against the documented ranges"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use constellation::identifier::Id;

    use super::*;

    #[test]
    fn test_unknown_endpoint_has_code_and_help() {
        let err = ConstellationError::UnknownEndpoint {
            edge: 3,
            endpoint: Id::new("ea-ghost"),
        };
        let adapter = ErrorAdapter(&err);

        assert_eq!(adapter.code().unwrap().to_string(), "constellation::graph");
        assert!(adapter.help().is_some());
        assert_eq!(
            adapter.to_string(),
            "Edge 3 references unknown node `ea-ghost`"
        );
    }

    #[test]
    fn test_io_error_has_no_help() {
        let err = ConstellationError::Io(std::io::Error::other("disk on fire"));
        let adapter = ErrorAdapter(&err);

        assert_eq!(adapter.code().unwrap().to_string(), "constellation::io");
        assert!(adapter.help().is_none());
    }
}
