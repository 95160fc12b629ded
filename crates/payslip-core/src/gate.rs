//! Administrative gate
//!
//! A shared string compared in plaintext against user input. This is a
//! cosmetic deterrent only: it is not hashed, not rotated, and anyone with
//! access to the config file or the process can read it. It must not be
//! treated as a security boundary.

/// Plaintext shared-secret check for admin-only actions
#[derive(Clone)]
pub struct AdminGate {
    secret: String,
}

impl AdminGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Compare input against the configured secret
    pub fn check(&self, input: &str) -> bool {
        input == self.secret
    }
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate").finish_non_exhaustive()
    }
}
