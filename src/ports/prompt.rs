//! Prompt Port - Interactive Confirmation Gate
//!
//! Destructive or session-ending actions (logout, delete, clear-all) go
//! through a yes/no question answered by the user.

/// Trait for asking the user a yes/no question.
pub trait Confirm {
    /// `true` when the user accepts.
    fn confirm(&self, question: &str) -> bool;
}

/// A gate with a fixed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Answer(pub bool);

impl Confirm for Answer {
    fn confirm(&self, _question: &str) -> bool {
        self.0
    }
}
