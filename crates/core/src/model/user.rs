use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};

use rota_shared::types::UserId;

use crate::access::Role;
use crate::workflow::WorkflowError;

/// A registered staff member. Never deleted by workflow logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Role, fixed per session.
    pub role: Role,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}

/// Registration payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewUser {
    /// Display name.
    #[garde(length(min = 1, max = 200))]
    pub name: String,
    /// Email address.
    #[garde(email)]
    pub email: String,
    /// Requested role.
    #[garde(skip)]
    pub role: Role,
}

impl NewUser {
    /// Validates the payload and builds the user record.
    ///
    /// The name is trimmed and the email lower-cased before validation.
    pub fn into_user(self) -> Result<User, WorkflowError> {
        let normalized = Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            role: self.role,
        };
        normalized
            .validate()
            .map_err(|report| WorkflowError::Validation(report.to_string()))?;

        Ok(User {
            id: UserId::new(),
            name: normalized.name,
            email: normalized.email,
            role: normalized.role,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            role: Role::Employee,
        }
    }

    #[test]
    fn test_into_user_normalizes() {
        let user = new_user("  Ada  ", " Ada@Example.COM ").into_user().unwrap();
        assert_eq!(user.name, "Ada");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.role, Role::Employee);
    }

    #[test]
    fn test_blank_name_rejected() {
        let result = new_user("   ", "ada@example.com").into_user();
        assert!(matches!(result, Err(WorkflowError::Validation(_))));
    }

    #[test]
    fn test_malformed_email_rejected() {
        let result = new_user("Ada", "not-an-email").into_user();
        assert!(matches!(result, Err(WorkflowError::Validation(_))));
    }
}
