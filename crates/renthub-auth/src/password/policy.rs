//! Password strength policy enforced at registration.

use renthub_core::config::auth::AuthConfig;
use renthub_core::error::AppError;

/// Validates candidate passwords against length and strength rules.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    /// Minimum accepted length.
    min_length: usize,
    /// Minimum accepted zxcvbn score (0-4).
    min_score: u8,
}

impl PasswordPolicy {
    /// Creates a policy from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            min_score: config.password_min_score.min(4),
        }
    }

    /// Checks a candidate password, using the account email as a
    /// dictionary input so trivially derived passwords score low.
    pub fn check(&self, password: &str, email: &str) -> Result<(), AppError> {
        if password.len() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        let entropy = zxcvbn::zxcvbn(password, &[email]);
        if (entropy.score() as u8) < self.min_score {
            return Err(AppError::validation(
                "Password is too weak; use a longer or less predictable phrase",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> PasswordPolicy {
        PasswordPolicy::new(&AuthConfig::default())
    }

    #[test]
    fn test_short_password_rejected() {
        assert!(policy().check("abc", "user@example.com").is_err());
    }

    #[test]
    fn test_weak_password_rejected() {
        assert!(policy().check("password", "user@example.com").is_err());
    }

    #[test]
    fn test_strong_password_accepted() {
        assert!(policy()
            .check("crimson-otter-battery-42", "user@example.com")
            .is_ok());
    }
}
