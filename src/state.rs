//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::{
    InMemoryStore, OwnerGroupRepository, PgOwnerGroupRepository, PgTripRecordRepository,
    PgVehicleRepository, TripRecordRepository, VehicleRepository,
};
use crate::services::{
    MileageService, OwnerGroupSynchronizer, ReportService, VehicleService,
};
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub vehicles: Arc<VehicleService>,
    pub mileage: Arc<MileageService>,
    pub reports: Arc<ReportService>,
    pub owner_group: Arc<OwnerGroupSynchronizer>,
    pub owner_groups: Arc<dyn OwnerGroupRepository>,
}

impl AppState {
    /// Estado respaldado por PostgreSQL
    pub fn postgres(pool: PgPool, config: EnvironmentConfig) -> AppResult<Self> {
        Self::assemble(
            config,
            Arc::new(PgVehicleRepository::new(pool.clone())),
            Arc::new(PgTripRecordRepository::new(pool.clone())),
            Arc::new(PgOwnerGroupRepository::new(pool)),
        )
    }

    /// Estado respaldado por el almacén en memoria
    pub fn in_memory(config: EnvironmentConfig) -> AppResult<Self> {
        let store = Arc::new(InMemoryStore::new());
        Self::assemble(config, store.clone(), store.clone(), store)
    }

    fn assemble(
        config: EnvironmentConfig,
        vehicle_repository: Arc<dyn VehicleRepository>,
        trip_repository: Arc<dyn TripRecordRepository>,
        owner_groups: Arc<dyn OwnerGroupRepository>,
    ) -> AppResult<Self> {
        let owner_group = Arc::new(OwnerGroupSynchronizer::new(
            vehicle_repository.clone(),
            owner_groups.clone(),
            config.owner_group_name.clone(),
        ));
        let vehicles =
            VehicleService::new(vehicle_repository.clone(), &config.registration_pattern)?
                .with_hook(owner_group.clone());

        Ok(Self {
            vehicles: Arc::new(vehicles),
            mileage: Arc::new(MileageService::new(trip_repository.clone(), vehicle_repository)),
            reports: Arc::new(ReportService::new(trip_repository)),
            owner_group,
            owner_groups,
            config,
        })
    }
}
