//! Catalog browsing with cached pages.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use renthub_cache::{CacheManager, keys};
use renthub_core::error::AppError;
use renthub_core::traits::CacheProvider;
use renthub_core::types::pagination::{PageRequest, PageResponse};
use renthub_database::repositories::MachineRepository;
use renthub_entity::machine::MachineWithStats;

/// Cached catalog TTL; machine and booking mutations invalidate earlier.
const CATALOG_TTL: Duration = Duration::from_secs(120);

/// Public catalog reads: listing, filtering, template detail.
#[derive(Debug, Clone)]
pub struct CatalogService {
    /// Machine repository.
    machine_repo: Arc<MachineRepository>,
    /// Query cache.
    cache: Arc<CacheManager>,
}

impl CatalogService {
    /// Creates a new catalog service.
    pub fn new(machine_repo: Arc<MachineRepository>, cache: Arc<CacheManager>) -> Self {
        Self {
            machine_repo,
            cache,
        }
    }

    /// One catalog page, optionally filtered by category and search text.
    pub async fn list(
        &self,
        category: Option<&str>,
        search: Option<&str>,
        page: &PageRequest,
    ) -> Result<PageResponse<MachineWithStats>, AppError> {
        let cache_key = keys::catalog_page(category, search, page.page);
        if let Some(cached) = self
            .cache
            .get_json::<PageResponse<MachineWithStats>>(&cache_key)
            .await?
        {
            return Ok(cached);
        }

        let result = self.machine_repo.list_catalog(category, search, page).await?;
        self.cache.set_json(&cache_key, &result, CATALOG_TTL).await?;
        Ok(result)
    }

    /// Template detail with owner name and counters.
    pub async fn get_detail(&self, template_id: Uuid) -> Result<MachineWithStats, AppError> {
        let cache_key = keys::machine_detail(template_id);
        if let Some(cached) = self.cache.get_json::<MachineWithStats>(&cache_key).await? {
            return Ok(cached);
        }

        let machine = self
            .machine_repo
            .find_with_stats(template_id)
            .await?
            .ok_or_else(|| AppError::not_found("Machine not found"))?;

        self.cache.set_json(&cache_key, &machine, CATALOG_TTL).await?;
        Ok(machine)
    }
}
