//! Machine template and instance management for owners.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use renthub_cache::{CacheManager, keys};
use renthub_core::error::AppError;
use renthub_core::traits::CacheProvider;
use renthub_database::repositories::{InstanceRepository, MachineRepository};
use renthub_entity::machine::{
    CreateInstance, CreateMachine, MachineInstance, MachineSpecs, MachineTemplate,
    MachineWithStats, UpdateMachine,
};
use renthub_storage::StorageManager;
use renthub_storage::manager::PresignedUpload;

use crate::context::RequestContext;

/// Input for listing a new machine (owner id comes from the context).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ListMachine {
    /// Display name.
    pub name: String,
    /// Owner-assigned short code.
    pub code: String,
    /// Long description.
    pub description: Option<String>,
    /// Catalog category.
    pub category: String,
    /// Rental price in integer cents per hour.
    pub price_per_hour_cents: i64,
    /// Structured presentation specs.
    pub specs: MachineSpecs,
}

/// Owner-side machine template and instance management.
#[derive(Debug, Clone)]
pub struct MachineService {
    /// Machine repository.
    machine_repo: Arc<MachineRepository>,
    /// Instance repository.
    instance_repo: Arc<InstanceRepository>,
    /// Storage manager for image uploads.
    storage: Arc<StorageManager>,
    /// Query cache.
    cache: Arc<CacheManager>,
}

impl MachineService {
    /// Creates a new machine service.
    pub fn new(
        machine_repo: Arc<MachineRepository>,
        instance_repo: Arc<InstanceRepository>,
        storage: Arc<StorageManager>,
        cache: Arc<CacheManager>,
    ) -> Self {
        Self {
            machine_repo,
            instance_repo,
            storage,
            cache,
        }
    }

    /// The owner's own templates with counters.
    pub async fn list_own(&self, ctx: &RequestContext) -> Result<Vec<MachineWithStats>, AppError> {
        ctx.require_owner()?;
        self.machine_repo.list_by_owner(ctx.user_id).await
    }

    /// Lists a new machine template.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: ListMachine,
    ) -> Result<MachineTemplate, AppError> {
        ctx.require_owner()?;
        if input.price_per_hour_cents < 0 {
            return Err(AppError::validation("price_per_hour_cents cannot be negative"));
        }

        let machine = self
            .machine_repo
            .create(&CreateMachine {
                owner_id: ctx.user_id,
                name: input.name,
                code: input.code,
                description: input.description,
                category: input.category,
                price_per_hour_cents: input.price_per_hour_cents,
                specs: input.specs,
            })
            .await?;

        info!(template_id = %machine.id, owner_id = %ctx.user_id, "Machine listed");
        self.invalidate_catalog(machine.id, ctx.user_id).await;
        Ok(machine)
    }

    /// Updates an owned template.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        template_id: Uuid,
        data: UpdateMachine,
    ) -> Result<MachineTemplate, AppError> {
        self.require_owned(ctx, template_id).await?;
        if matches!(data.price_per_hour_cents, Some(p) if p < 0) {
            return Err(AppError::validation("price_per_hour_cents cannot be negative"));
        }

        let machine = self.machine_repo.update(template_id, &data).await?;
        self.invalidate_catalog(template_id, ctx.user_id).await;
        Ok(machine)
    }

    /// Removes an owned template and its instances.
    pub async fn delete(&self, ctx: &RequestContext, template_id: Uuid) -> Result<(), AppError> {
        self.require_owned(ctx, template_id).await?;

        if !self.machine_repo.delete(template_id).await? {
            return Err(AppError::not_found("Machine not found"));
        }
        info!(template_id = %template_id, "Machine delisted");
        self.invalidate_catalog(template_id, ctx.user_id).await;
        Ok(())
    }

    /// The instances of an owned template (uncached; tiny list).
    pub async fn list_instances(
        &self,
        ctx: &RequestContext,
        template_id: Uuid,
    ) -> Result<Vec<MachineInstance>, AppError> {
        self.require_owned(ctx, template_id).await?;
        self.instance_repo.list_by_template(template_id).await
    }

    /// Registers a new physical instance of an owned template.
    pub async fn add_instance(
        &self,
        ctx: &RequestContext,
        template_id: Uuid,
        code: &str,
        active: bool,
    ) -> Result<MachineInstance, AppError> {
        self.require_owned(ctx, template_id).await?;
        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::validation("Instance code cannot be empty"));
        }

        let instance = self
            .instance_repo
            .create(&CreateInstance {
                template_id,
                code: code.to_string(),
                active,
            })
            .await?;

        self.invalidate_catalog(template_id, ctx.user_id).await;
        Ok(instance)
    }

    /// Activates or deactivates an owned instance.
    pub async fn set_instance_active(
        &self,
        ctx: &RequestContext,
        instance_id: Uuid,
        active: bool,
    ) -> Result<MachineInstance, AppError> {
        let instance = self
            .instance_repo
            .find_by_id(instance_id)
            .await?
            .ok_or_else(|| AppError::not_found("Instance not found"))?;
        self.require_owned(ctx, instance.template_id).await?;

        let updated = self.instance_repo.set_active(instance_id, active).await?;
        self.invalidate_catalog(instance.template_id, ctx.user_id).await;
        Ok(updated)
    }

    /// Issues a pre-signed upload for a machine image.
    ///
    /// The object lands under the template's media prefix; the owner
    /// references it from the template specs after the upload succeeds.
    pub async fn presign_image(
        &self,
        ctx: &RequestContext,
        template_id: Uuid,
        file_name: &str,
        content_type: &str,
    ) -> Result<PresignedUpload, AppError> {
        self.require_owned(ctx, template_id).await?;

        if !content_type.starts_with("image/") {
            return Err(AppError::validation("Machine media must be an image"));
        }
        let file_name = file_name.trim().trim_start_matches('/');
        if file_name.is_empty() || file_name.contains('/') {
            return Err(AppError::validation("Invalid file name"));
        }

        let path = format!("machines/{template_id}/{}-{file_name}", Uuid::new_v4());
        self.storage.presign_upload(&path, content_type)
    }

    /// Errors unless the template exists and belongs to the actor.
    async fn require_owned(&self, ctx: &RequestContext, template_id: Uuid) -> Result<(), AppError> {
        ctx.require_owner()?;
        let machine = self
            .machine_repo
            .find_by_id(template_id)
            .await?
            .ok_or_else(|| AppError::not_found("Machine not found"))?;
        if machine.owner_id != ctx.user_id {
            return Err(AppError::forbidden("You do not own this machine"));
        }
        Ok(())
    }

    /// Drops every cached read a machine mutation can make stale.
    async fn invalidate_catalog(&self, template_id: Uuid, owner_id: Uuid) {
        let _ = self.cache.delete(&keys::machine_detail(template_id)).await;
        let _ = self.cache.delete_pattern(&keys::catalog_pattern()).await;
        let _ = self.cache.delete(&keys::owner_dashboard(owner_id)).await;
    }
}
