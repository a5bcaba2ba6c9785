//! Master password strength policy.
//!
//! A master password must be at least 8 bytes long and contain at least
//! one lowercase letter, one uppercase letter, one digit and one
//! character that is none of those.  Every rule is evaluated, so a
//! caller can report all of the violations at once.

use std::fmt;

/// Minimum master password length in bytes.
pub const MIN_PASSWORD_LEN: usize = 8;

/// A single strength rule a master password must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    MinLength,
    Lowercase,
    Uppercase,
    Digit,
    Special,
}

impl PasswordRule {
    /// All rules, in the order they are checked.
    pub const ALL: [PasswordRule; 5] = [
        PasswordRule::MinLength,
        PasswordRule::Lowercase,
        PasswordRule::Uppercase,
        PasswordRule::Digit,
        PasswordRule::Special,
    ];

    /// Returns `true` if `password` satisfies this rule.
    pub fn is_satisfied_by(self, password: &[u8]) -> bool {
        match self {
            PasswordRule::MinLength => password.len() >= MIN_PASSWORD_LEN,
            PasswordRule::Lowercase => password.iter().any(u8::is_ascii_lowercase),
            PasswordRule::Uppercase => password.iter().any(u8::is_ascii_uppercase),
            PasswordRule::Digit => password.iter().any(u8::is_ascii_digit),
            PasswordRule::Special => password.iter().any(|b| !b.is_ascii_alphanumeric()),
        }
    }
}

impl fmt::Display for PasswordRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordRule::MinLength => {
                write!(f, "must be at least {MIN_PASSWORD_LEN} characters long")
            }
            PasswordRule::Lowercase => f.write_str("must include at least one lowercase character"),
            PasswordRule::Uppercase => f.write_str("must include at least one uppercase character"),
            PasswordRule::Digit => f.write_str("must include at least one digit"),
            PasswordRule::Special => f.write_str("must include at least one special character"),
        }
    }
}

/// The rules a candidate master password failed, in check order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyError {
    violations: Vec<PasswordRule>,
}

impl PolicyError {
    pub fn violations(&self) -> &[PasswordRule] {
        &self.violations
    }

    /// The first failing rule (length is always checked first).
    pub fn first(&self) -> PasswordRule {
        self.violations
            .first()
            .copied()
            .unwrap_or(PasswordRule::MinLength)
    }

    pub fn violates(&self, rule: PasswordRule) -> bool {
        self.violations.contains(&rule)
    }
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("master password ")?;
        for (i, rule) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{rule}")?;
        }
        Ok(())
    }
}

impl std::error::Error for PolicyError {}

/// Judge whether `password` is strong enough to become a master password.
pub fn check_strength(password: &[u8]) -> std::result::Result<(), PolicyError> {
    let violations: Vec<PasswordRule> = PasswordRule::ALL
        .into_iter()
        .filter(|rule| !rule.is_satisfied_by(password))
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(PolicyError { violations })
    }
}
