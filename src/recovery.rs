//! Strict and lenient handling of non-conformant input.
//!
//! Decoding is strict by default. Producers that write slightly malformed
//! leaders or non-contiguous directories can be read with
//! [`RecoveryMode::Lenient`], which substitutes conventional values where it
//! is safe to do so and records a message for every substitution. Values that
//! determine record geometry are never coerced.

use crate::error::{FormatError, Result};

/// Strategy for handling non-conformant records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryMode {
    /// Strict mode: return errors for any malformation (default)
    #[default]
    Strict,
    /// Lenient mode: substitute conventional values where geometry is unaffected
    Lenient,
}

/// Recovery context for a single decode call.
///
/// Collects one message per recovered anomaly so callers can report what was
/// coerced.
#[derive(Debug, Default)]
pub struct RecoveryContext {
    /// Current recovery mode
    pub mode: RecoveryMode,
    /// Whether any recovery was needed
    pub has_errors: bool,
    /// List of recovery messages
    pub recovery_messages: Vec<String>,
}

impl RecoveryContext {
    /// Create a new recovery context with the given mode
    #[must_use]
    pub fn new(mode: RecoveryMode) -> Self {
        RecoveryContext {
            mode,
            has_errors: false,
            recovery_messages: Vec::new(),
        }
    }

    fn add_message(&mut self, message: String) {
        self.has_errors = true;
        self.recovery_messages.push(message);
    }

    /// Try to recover from an error based on the recovery mode.
    ///
    /// # Errors
    ///
    /// Returns `error` in strict mode; otherwise records it and returns
    /// `Ok(None)` so the caller can substitute a fallback.
    pub fn recover<T>(&mut self, error: FormatError, context: &str) -> Result<Option<T>> {
        match self.mode {
            RecoveryMode::Strict => Err(error),
            RecoveryMode::Lenient => {
                self.add_message(format!("{context}: {error}"));
                Ok(None)
            },
        }
    }

    /// Move the accumulated messages out, leaving the context clean.
    pub fn take_messages(&mut self) -> Vec<String> {
        self.has_errors = false;
        std::mem::take(&mut self.recovery_messages)
    }
}
