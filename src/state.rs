use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::{EmployeeStore, KeyValueStore};
use crate::seed::{IdentitySource, SeedAdapter};
use crate::utils::session::{CredentialCheck, MockCredentials, SessionGate};
use crate::utils::validation::ImageRule;

/// Everything a handler needs, shared through `web::Data`.
pub struct AppState {
    pub employees: Arc<EmployeeStore>,
    pub session: SessionGate,
    pub seeder: SeedAdapter,
    pub image_rule: ImageRule,
}

impl AppState {
    pub fn new(
        kv: Arc<dyn KeyValueStore>,
        credentials: Box<dyn CredentialCheck>,
        source: Arc<dyn IdentitySource>,
        seed_count: usize,
        seed_enabled: bool,
        image_rule: ImageRule,
    ) -> Self {
        let employees = Arc::new(EmployeeStore::new(kv.clone()));
        Self {
            session: SessionGate::new(credentials, kv),
            seeder: SeedAdapter::new(source, employees.clone(), seed_count, seed_enabled),
            employees,
            image_rule,
        }
    }

    pub fn from_config(
        config: &AppConfig,
        kv: Arc<dyn KeyValueStore>,
        source: Arc<dyn IdentitySource>,
    ) -> Self {
        Self::new(
            kv,
            Box::new(MockCredentials::default()),
            source,
            config.seed.count,
            config.seed.enabled,
            config.image_rule,
        )
    }
}
