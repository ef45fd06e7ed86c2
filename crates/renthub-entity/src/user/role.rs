//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marketplace actor roles.
///
/// Owners list machines and decide on bookings; clients browse the
/// catalog and request them. The role namespaces the API surface, it is
/// not a privilege lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Lists machine templates and instances, approves or rejects bookings.
    Owner,
    /// Browses the catalog and requests bookings.
    Client,
}

impl UserRole {
    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Client => "client",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = renthub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "client" => Ok(Self::Client),
            _ => Err(renthub_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: owner, client"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("owner".parse::<UserRole>().unwrap(), UserRole::Owner);
        assert_eq!("CLIENT".parse::<UserRole>().unwrap(), UserRole::Client);
        assert!("tenant".parse::<UserRole>().is_err());
    }
}
