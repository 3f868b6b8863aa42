//! Recovery strategies for records that cannot be built.
//!
//! A record whose controlfield 001 is missing has no identity and cannot be
//! reported on. Depending on the [`RecoveryMode`], the extractor either stops
//! with the error or skips the record and keeps a note of it in a
//! [`RecoveryContext`].
//!
//! Document-level problems (malformed XML) are never recoverable and bypass
//! this module entirely.

use crate::error::{Result, ShelflinkError};
use serde::{Deserialize, Serialize};

/// Strategy for handling records with structural problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryMode {
    /// Strict mode: the first bad record aborts extraction
    Strict,
    /// Lenient mode: skip the bad record, log it and continue (default)
    #[default]
    Lenient,
}

/// Recovery context for one extraction run
#[derive(Debug, Default)]
pub struct RecoveryContext {
    /// Current recovery mode
    pub mode: RecoveryMode,
    /// Number of records skipped so far
    pub skipped: usize,
    /// One message per skipped record
    pub recovery_messages: Vec<String>,
}

impl RecoveryContext {
    /// Create a new recovery context with the given mode
    #[must_use]
    pub fn new(mode: RecoveryMode) -> Self {
        RecoveryContext {
            mode,
            skipped: 0,
            recovery_messages: Vec::new(),
        }
    }

    /// Try to recover from an error based on the recovery mode
    ///
    /// # Errors
    ///
    /// Returns the error if in strict mode, otherwise records it and returns `Ok(None)`.
    pub fn recover<T>(&mut self, error: ShelflinkError, context: &str) -> Result<Option<T>> {
        match self.mode {
            RecoveryMode::Strict => Err(error),
            RecoveryMode::Lenient => {
                let message = format!("{context}: {error}");
                tracing::warn!("skipping record: {message}");
                self.skipped += 1;
                self.recovery_messages.push(message);
                Ok(None)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_id() -> ShelflinkError {
        ShelflinkError::MissingRequiredField {
            field: "controlfield 001".to_string(),
            position: 3,
        }
    }

    #[test]
    fn test_recovery_context_default() {
        let ctx = RecoveryContext::default();
        assert_eq!(ctx.mode, RecoveryMode::Lenient);
        assert_eq!(ctx.skipped, 0);
        assert!(ctx.recovery_messages.is_empty());
    }

    #[test]
    fn test_recovery_mode_lenient() {
        let mut ctx = RecoveryContext::new(RecoveryMode::Lenient);
        let result: Result<Option<()>> = ctx.recover(missing_id(), "record 3");
        assert!(matches!(result, Ok(None)));
        assert_eq!(ctx.skipped, 1);
        assert!(ctx.recovery_messages[0].contains("controlfield 001"));
    }

    #[test]
    fn test_recovery_mode_strict() {
        let mut ctx = RecoveryContext::new(RecoveryMode::Strict);
        let result: Result<Option<()>> = ctx.recover(missing_id(), "record 3");
        assert!(matches!(
            result,
            Err(ShelflinkError::MissingRequiredField { position: 3, .. })
        ));
        assert_eq!(ctx.skipped, 0);
    }
}
