//! The allow/block decision handed back to the workflow engine.

use super::ADMIN_CONTACT_MESSAGE;

/// Outcome of validating one transition.
///
/// An allowed verdict never carries a message; a blocked one always carries a
/// non-empty message. The constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    allowed: bool,
    message: Option<String>,
}

impl Verdict {
    /// Lets the transition proceed.
    #[must_use]
    pub fn allow() -> Self {
        Self { allowed: true, message: None }
    }

    /// Blocks the transition with an explanation.
    ///
    /// A blank message is replaced by [`ADMIN_CONTACT_MESSAGE`].
    #[must_use]
    pub fn block(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            ADMIN_CONTACT_MESSAGE.to_string()
        } else {
            message
        };
        Self { allowed: false, message: Some(message) }
    }

    /// Whether the transition may proceed.
    #[must_use]
    pub fn allowed(&self) -> bool {
        self.allowed
    }

    /// Explanation shown to the user when blocked.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Splits the verdict into its parts.
    #[must_use]
    pub fn into_parts(self) -> (bool, Option<String>) {
        (self.allowed, self.message)
    }
}
