use std::sync::Arc;

use rota_shared::types::UserId;

use crate::access::{AccessPolicy, Action, EntityKind, Principal};
use crate::model::{NewUser, User};
use crate::store::{EntityStore, UserFilter};
use crate::workflow::WorkflowError;

/// User registration and lookup.
#[derive(Clone)]
pub struct UserDirectory {
    store: Arc<dyn EntityStore>,
}

impl UserDirectory {
    /// Creates the directory over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Registers a new user. Not role-gated: registration precedes sign-in.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank name or malformed email, `Conflict` when the
    /// email is already registered.
    pub async fn register(&self, new_user: NewUser) -> Result<User, WorkflowError> {
        let user = new_user.into_user()?;
        let existing = self
            .store
            .find_users(&UserFilter {
                email: Some(user.email.clone()),
            })
            .await?;
        if !existing.is_empty() {
            return Err(WorkflowError::Conflict(format!(
                "email {} is already registered",
                user.email
            )));
        }

        let user = self.store.insert_user(user).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(user)
    }

    /// Lists every user. Open to all roles.
    pub async fn list_users(&self, principal: &Principal) -> Result<Vec<User>, WorkflowError> {
        AccessPolicy::authorize(principal, Action::ListUsers)?;
        Ok(self.store.find_users(&UserFilter::default()).await?)
    }

    /// Finds a user by id.
    ///
    /// # Errors
    ///
    /// `NotFound` if no such user exists.
    pub async fn find_user(&self, id: UserId) -> Result<User, WorkflowError> {
        self.store
            .find_user(id)
            .await?
            .ok_or(WorkflowError::NotFound {
                entity: EntityKind::User,
                id: id.into_inner(),
            })
    }
}
