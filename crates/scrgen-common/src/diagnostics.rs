//! Non-fatal diagnostic accumulation.
//!
//! The compiler favors maximal partial output over early termination: a bad
//! reference or an invalid attribute is recorded and processing continues.
//! Diagnostics are collected in a [`Diagnostics`] value that travels with the
//! pipeline and is returned to the caller next to the produced resources.

use thiserror::Error;

/// A single non-fatal finding recorded during compilation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// A clause could not be fully resolved: unresolved class, unrecognized
    /// directive, or a bad reference. The descriptor is still emitted on a
    /// best-effort basis.
    #[error("resolution error: {message}")]
    Resolution {
        /// Description of the resolution failure.
        message: String,
    },

    /// An attribute failed validation during emission. The offending
    /// attribute or element is still written.
    #[error("validation error: {message}")]
    Validation {
        /// Description of the invalid attribute.
        message: String,
    },

    /// Advisory finding: conflicting flags, a bad property type.
    #[error("warning: {message}")]
    Warning {
        /// Description of the advisory condition.
        message: String,
    },
}

impl Diagnostic {
    /// Returns `true` for error-severity diagnostics (resolution and
    /// validation errors), `false` for warnings.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        !matches!(self, Self::Warning { .. })
    }
}

/// Ordered collection of diagnostics recorded during one compilation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty diagnostic collection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Records a resolution error.
    pub fn resolution_error(&mut self, message: impl Into<String>) {
        self.entries.push(Diagnostic::Resolution {
            message: message.into(),
        });
    }

    /// Records a validation error.
    pub fn validation_error(&mut self, message: impl Into<String>) {
        self.entries.push(Diagnostic::Validation {
            message: message.into(),
        });
    }

    /// Records a warning.
    pub fn warning(&mut self, message: impl Into<String>) {
        self.entries.push(Diagnostic::Warning {
            message: message.into(),
        });
    }

    /// Returns `true` when any error-severity diagnostic was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(Diagnostic::is_error)
    }

    /// Returns `true` when nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of recorded diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over recorded diagnostics in recording order.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
