//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y sus variantes para CRUD operations.
//! Mapea a la tabla vehicles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Tipo de vehículo - mapea al ENUM vehicle_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "vehicle_type")]
pub enum VehicleType {
    /// Motor de hasta 900cc
    #[serde(rename = "lte9")]
    #[sqlx(rename = "lte9")]
    SmallEngine,
    /// Motor de más de 900cc
    #[serde(rename = "gt9")]
    #[sqlx(rename = "gt9")]
    LargeEngine,
    #[serde(rename = "mb")]
    #[sqlx(rename = "mb")]
    Motorbike,
    #[serde(rename = "sct")]
    #[sqlx(rename = "sct")]
    Scooter,
}

/// Estado del vehículo dentro de la flota, derivado de `active`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FleetStatus {
    #[serde(rename = "in")]
    InFleet,
    #[serde(rename = "off")]
    OffFleet,
}

/// Vehicle principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub registration_number: String,
    pub vehicle_type: VehicleType,
    pub active: bool,
    pub owner_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn status(&self) -> FleetStatus {
        if self.active {
            FleetStatus::InFleet
        } else {
            FleetStatus::OffFleet
        }
    }

    pub fn from_new(input: NewVehicle, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            registration_number: input.registration_number,
            vehicle_type: input.vehicle_type,
            active: input.active,
            owner_ids: dedup_owners(input.owner_ids),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: VehiclePatch, now: DateTime<Utc>) {
        if let Some(registration_number) = patch.registration_number {
            self.registration_number = registration_number;
        }
        if let Some(vehicle_type) = patch.vehicle_type {
            self.vehicle_type = vehicle_type;
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
        if let Some(owner_ids) = patch.owner_ids {
            self.owner_ids = dedup_owners(owner_ids);
        }
        self.updated_at = now;
    }
}

/// Datos para registrar un vehículo
#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub registration_number: String,
    pub vehicle_type: VehicleType,
    pub active: bool,
    pub owner_ids: Vec<Uuid>,
}

/// Cambios sobre un vehículo existente
#[derive(Debug, Clone, Default)]
pub struct VehiclePatch {
    pub registration_number: Option<String>,
    pub vehicle_type: Option<VehicleType>,
    pub active: Option<bool>,
    pub owner_ids: Option<Vec<Uuid>>,
}

fn dedup_owners(mut owner_ids: Vec<Uuid>) -> Vec<Uuid> {
    owner_ids.sort();
    owner_ids.dedup();
    owner_ids
}
