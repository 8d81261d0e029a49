//! Module declaration and lifecycle
//!
//! The host calls [`AdmissionEngineModule::migrate`], then `init`, then
//! `register_rest` on its router. In-process callers use `client`.

use crate::config::Config;
use crate::contract::AdmissionApi;
use crate::domain::{NoOpDispatcher, NotificationDispatcher, Service};
use crate::infra::storage::repositories::{
    SeaOrmAttendeeRepository, SeaOrmSeatingRepository, SeaOrmTicketFormRepository,
};
use anyhow::Result;
use parking_lot::RwLock;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Admission engine module
pub struct AdmissionEngineModule {
    config: RwLock<Config>,
    dispatcher: RwLock<Arc<dyn NotificationDispatcher>>,
    service: RwLock<Option<Arc<Service>>>,
}

impl Default for AdmissionEngineModule {
    fn default() -> Self {
        Self {
            config: RwLock::new(Config::default()),
            dispatcher: RwLock::new(Arc::new(NoOpDispatcher)),
            service: RwLock::new(None),
        }
    }
}

impl AdmissionEngineModule {
    /// Module with the given configuration and no notification delivery
    pub fn new(config: Config) -> Self {
        let module = Self::default();
        *module.config.write() = config;
        module
    }

    /// Replace the notification dispatcher; takes effect on the next `init`
    pub fn with_dispatcher(self, dispatcher: Arc<dyn NotificationDispatcher>) -> Self {
        *self.dispatcher.write() = dispatcher;
        self
    }

    /// Build repositories and the domain service on top of `db`
    pub async fn init(&self, db: Arc<DatabaseConnection>) -> Result<()> {
        let forms = Arc::new(SeaOrmTicketFormRepository::new(db.clone()));
        let attendees = Arc::new(SeaOrmAttendeeRepository::new(db.clone()));
        let seating = Arc::new(SeaOrmSeatingRepository::new(db));

        let dispatcher = self.dispatcher.read().clone();
        let config = self.config.read().clone();

        let service = Arc::new(Service::new(forms, attendees, seating, dispatcher, config));
        *self.service.write() = Some(service);

        tracing::info!("Admission engine initialized");
        Ok(())
    }

    /// Apply pending database migrations
    pub async fn migrate(&self, db: &DatabaseConnection) -> Result<()> {
        use crate::infra::storage::migrations::Migrator;
        use sea_orm_migration::MigratorTrait;

        Migrator::up(db, None).await?;
        tracing::info!("Admission engine migrations completed");
        Ok(())
    }

    /// Mount the REST routes on `router`
    pub fn register_rest(&self, router: axum::Router) -> Result<axum::Router> {
        let service = self.service()?;

        tracing::info!("Registering admission engine REST routes");
        crate::api::rest::routes::register_routes(router, service)
    }

    /// In-process client for other modules
    pub fn client(&self) -> Result<Arc<dyn AdmissionApi>> {
        let service = self.service()?;
        Ok(Arc::new(crate::api::native::NativeClient::new(service)))
    }

    fn service(&self) -> Result<Arc<Service>> {
        self.service
            .read()
            .as_ref()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))
    }
}
