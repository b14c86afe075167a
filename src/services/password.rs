//! Password gate for article and comment mutations
//!
//! Articles and comments carry a plaintext shared secret. Updates and deletes
//! go through [`PasswordGate::check`], which compares exactly and then applies
//! the configured [`PasswordMismatchPolicy`] when the comparison fails.

use crate::config::PasswordMismatchPolicy;

/// Raised by the gate under [`PasswordMismatchPolicy::Reject`]
#[derive(Debug, thiserror::Error)]
#[error("Password does not match for {0}")]
pub struct PasswordRejected(pub String);

/// Applies the password mismatch policy to a password comparison
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordGate {
    policy: PasswordMismatchPolicy,
}

impl PasswordGate {
    pub fn new(policy: PasswordMismatchPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> PasswordMismatchPolicy {
        self.policy
    }

    /// Compare `supplied` against `stored` for the resource named by `target`.
    ///
    /// Returns `Ok(true)` when the mutation may proceed and `Ok(false)` when a
    /// mismatch is ignored.
    ///
    /// # Errors
    ///
    /// `PasswordRejected` on a mismatch under the `reject` policy.
    pub fn check(&self, stored: &str, supplied: &str, target: &str) -> Result<bool, PasswordRejected> {
        if stored == supplied {
            return Ok(true);
        }

        match self.policy {
            PasswordMismatchPolicy::Ignore => {
                tracing::debug!("Password mismatch for {}, ignoring", target);
                Ok(false)
            }
            PasswordMismatchPolicy::Reject => {
                tracing::debug!("Password mismatch for {}, rejecting", target);
                Err(PasswordRejected(target.to_string()))
            }
        }
    }
}
