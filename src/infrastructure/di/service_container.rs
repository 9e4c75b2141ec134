//! Service container for dependency injection
//!
//! Wires up the navigation service with its repository.

use std::sync::Arc;

use crate::application::services::NavigationService;
use crate::config::Settings;
use crate::infrastructure::repository::InMemoryRepository;
use crate::infrastructure::traits::ItemRepository;
use crate::infrastructure::InfraResult;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Content store
    pub repo: Arc<dyn ItemRepository>,

    pub navigation: NavigationService,
}

impl ServiceContainer {
    /// Create a container backed by a TOML site file.
    pub fn from_site_file(settings: Settings, site_file: &std::path::Path) -> InfraResult<Self> {
        let repo = InMemoryRepository::load(site_file)?;
        Ok(Self::with_deps(settings, Arc::new(repo)))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, repo: Arc<dyn ItemRepository>) -> Self {
        let settings = Arc::new(settings);
        let navigation = NavigationService::new(Arc::clone(&repo));

        Self {
            settings,
            repo,
            navigation,
        }
    }
}
