//! User-facing prompts raised by list editors.

/// Surfaces a blocking, user-facing error message.
pub trait Alerter: Send + Sync {
    fn alert(&self, message: &str);
}

/// Asks the user a synchronous yes/no question.
pub trait Confirmer: Send + Sync {
    fn confirm(&self, question: &str) -> bool;
}

/// Answers every question the same way.
impl Confirmer for bool {
    fn confirm(&self, _question: &str) -> bool {
        *self
    }
}
