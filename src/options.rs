//! Explicit configuration for decode and encode calls.
//!
//! Nothing in the codec reads process-wide defaults; every choice that could
//! differ between callers travels in one of these structs.

use crate::leader::CharacterCoding;
use crate::recovery::{RecoveryContext, RecoveryMode};

/// Options controlling how bytes are decoded into records.
///
/// # Examples
///
/// ```
/// use marc21_codec::{DecodeOptions, RecoveryMode};
///
/// let options = DecodeOptions::new().with_recovery_mode(RecoveryMode::Lenient);
/// assert_eq!(options.recovery_mode, RecoveryMode::Lenient);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// How non-conformant leaders and directories are handled
    pub recovery_mode: RecoveryMode,
}

impl DecodeOptions {
    /// Strict decoding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the recovery mode.
    #[must_use]
    pub fn with_recovery_mode(mut self, mode: RecoveryMode) -> Self {
        self.recovery_mode = mode;
        self
    }

    /// A fresh recovery context for one decode call.
    #[must_use]
    pub fn context(&self) -> RecoveryContext {
        RecoveryContext::new(self.recovery_mode)
    }
}

/// Options controlling how records are encoded into bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Overrides leader position 9 on output; `None` keeps the record's own value
    pub character_coding: Option<CharacterCoding>,
}

impl EncodeOptions {
    /// Encode records exactly as they are.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the character coding written to leader position 9.
    #[must_use]
    pub fn with_character_coding(mut self, coding: CharacterCoding) -> Self {
        self.character_coding = Some(coding);
        self
    }
}
