//! Almacén en memoria
//!
//! Implementa los tres repositorios sobre un único estado compartido, de modo que
//! el borrado de un vehículo arrastra sus registros igual que en PostgreSQL.
//! Se usa con `STORAGE_BACKEND=memory` y en los tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::trip_record::sort_newest_first;
use crate::models::{TripChangeSet, TripFilter, TripRecord, Vehicle};
use crate::repositories::owner_group_repository::OwnerGroupRepository;
use crate::repositories::trip_record_repository::TripRecordRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::AppResult;

#[derive(Default)]
struct MemoryState {
    vehicles: HashMap<Uuid, Vehicle>,
    trips: HashMap<Uuid, TripRecord>,
    groups: HashMap<String, Vec<Uuid>>,
}

#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VehicleRepository for InMemoryStore {
    async fn insert_vehicle(&self, vehicle: &Vehicle) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.vehicles.insert(vehicle.id, vehicle.clone());
        Ok(())
    }

    async fn update_vehicle(&self, vehicle: &Vehicle) -> AppResult<()> {
        let mut state = self.state.write().await;
        if let Some(stored) = state.vehicles.get_mut(&vehicle.id) {
            *stored = vehicle.clone();
        }
        Ok(())
    }

    async fn delete_vehicle(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.vehicles.remove(&id);
        state.trips.retain(|_, trip| trip.vehicle_id != id);
        Ok(())
    }

    async fn find_vehicle(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        Ok(self.state.read().await.vehicles.get(&id).cloned())
    }

    async fn list_vehicles(&self, include_inactive: bool) -> AppResult<Vec<Vehicle>> {
        let state = self.state.read().await;
        let mut vehicles: Vec<Vehicle> = state
            .vehicles
            .values()
            .filter(|v| v.active || include_inactive)
            .cloned()
            .collect();
        vehicles.sort_by(|a, b| a.registration_number.cmp(&b.registration_number));
        Ok(vehicles)
    }

    async fn registration_exists(
        &self,
        registration_number: &str,
        exclude: Option<Uuid>,
    ) -> AppResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .vehicles
            .values()
            .any(|v| v.registration_number == registration_number && Some(v.id) != exclude))
    }
}

#[async_trait]
impl TripRecordRepository for InMemoryStore {
    async fn find_trip(&self, id: Uuid) -> AppResult<Option<TripRecord>> {
        Ok(self.state.read().await.trips.get(&id).cloned())
    }

    async fn trips_for_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<TripRecord>> {
        let state = self.state.read().await;
        let mut trips: Vec<TripRecord> = state
            .trips
            .values()
            .filter(|t| t.vehicle_id == vehicle_id)
            .cloned()
            .collect();
        sort_newest_first(&mut trips);
        Ok(trips)
    }

    async fn search_trips(&self, filter: &TripFilter) -> AppResult<Vec<TripRecord>> {
        let state = self.state.read().await;
        let mut trips: Vec<TripRecord> = state
            .trips
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        sort_newest_first(&mut trips);
        Ok(trips)
    }

    async fn apply_trip_changes(&self, changes: TripChangeSet) -> AppResult<()> {
        let mut state = self.state.write().await;
        for id in &changes.deletions {
            state.trips.remove(id);
        }
        for trip in changes.upserts {
            state.trips.insert(trip.id, trip);
        }
        Ok(())
    }
}

#[async_trait]
impl OwnerGroupRepository for InMemoryStore {
    async fn group_members(&self, group: &str) -> AppResult<Vec<Uuid>> {
        let state = self.state.read().await;
        Ok(state.groups.get(group).cloned().unwrap_or_default())
    }

    async fn replace_group_members(&self, group: &str, members: &[Uuid]) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.groups.insert(group.to_string(), members.to_vec());
        Ok(())
    }
}
