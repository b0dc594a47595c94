//! Sincronización del grupo de propietarios
//!
//! El grupo contiene la unión de los propietarios de todos los vehículos activos.
//! Cada cambio en un vehículo recalcula la unión desde cero y reemplaza los
//! miembros del grupo por completo.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::Vehicle;
use crate::repositories::{OwnerGroupRepository, VehicleRepository};
use crate::services::vehicle_service::VehicleHook;
use crate::utils::errors::AppResult;

pub struct OwnerGroupSynchronizer {
    vehicles: Arc<dyn VehicleRepository>,
    groups: Arc<dyn OwnerGroupRepository>,
    group_name: String,
}

impl OwnerGroupSynchronizer {
    pub fn new(
        vehicles: Arc<dyn VehicleRepository>,
        groups: Arc<dyn OwnerGroupRepository>,
        group_name: impl Into<String>,
    ) -> Self {
        Self {
            vehicles,
            groups,
            group_name: group_name.into(),
        }
    }

    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    /// Recalcula y reemplaza los miembros del grupo.
    ///
    /// `triggering` son los vehículos que provocaron la sincronización. Con
    /// `include_triggering` entran en la unión los propietarios de los que siguen
    /// activos; sin él, esos vehículos se ignoran (caso de borrado).
    pub async fn sync(
        &self,
        triggering: &[Vehicle],
        include_triggering: bool,
    ) -> AppResult<Vec<Uuid>> {
        let triggering_ids: HashSet<Uuid> = triggering.iter().map(|v| v.id).collect();

        let mut members: BTreeSet<Uuid> = BTreeSet::new();
        if include_triggering {
            members.extend(
                triggering
                    .iter()
                    .filter(|v| v.active)
                    .flat_map(|v| v.owner_ids.iter().copied()),
            );
        }

        let others = self.vehicles.list_vehicles(false).await?;
        members.extend(
            others
                .iter()
                .filter(|v| !triggering_ids.contains(&v.id))
                .flat_map(|v| v.owner_ids.iter().copied()),
        );

        let members: Vec<Uuid> = members.into_iter().collect();
        self.groups
            .replace_group_members(&self.group_name, &members)
            .await?;

        info!(
            group = %self.group_name,
            members = members.len(),
            "Owner group membership replaced"
        );
        Ok(members)
    }
}

#[async_trait]
impl VehicleHook for OwnerGroupSynchronizer {
    async fn after_create(&self, created: &[Vehicle]) -> AppResult<()> {
        debug!(count = created.len(), "Syncing owner group after vehicle create");
        self.sync(created, true).await.map(|_| ())
    }

    async fn after_update(&self, updated: &[Vehicle]) -> AppResult<()> {
        debug!(count = updated.len(), "Syncing owner group after vehicle update");
        self.sync(updated, true).await.map(|_| ())
    }

    async fn before_delete(&self, removed: &[Vehicle]) -> AppResult<()> {
        debug!(count = removed.len(), "Syncing owner group before vehicle delete");
        self.sync(removed, false).await.map(|_| ())
    }
}
