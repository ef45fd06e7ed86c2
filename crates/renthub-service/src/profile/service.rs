//! Profile management.
//!
//! The profile is the user-editable subset of the account. Email is
//! read-only: [`UpdateProfile`] has no email field, so no code path can
//! change it after registration.

use std::sync::Arc;

use renthub_core::error::AppError;
use renthub_database::repositories::UserRepository;
use renthub_entity::user::{UpdateProfile, User};

use crate::context::RequestContext;

/// Profile reads and updates for the authenticated user.
#[derive(Debug, Clone)]
pub struct ProfileService {
    /// User repository.
    user_repo: Arc<UserRepository>,
}

impl ProfileService {
    /// Creates a new profile service.
    pub fn new(user_repo: Arc<UserRepository>) -> Self {
        Self { user_repo }
    }

    /// The authenticated user's account row.
    pub async fn get(&self, ctx: &RequestContext) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Updates the editable profile fields.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        data: UpdateProfile,
    ) -> Result<User, AppError> {
        if matches!(&data.name, Some(n) if n.trim().is_empty()) {
            return Err(AppError::validation("Name cannot be empty"));
        }
        self.user_repo.update_profile(ctx.user_id, &data).await
    }
}
