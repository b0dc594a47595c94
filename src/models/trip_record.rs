//! Modelo de TripRecord
//!
//! Este módulo contiene el registro de kilometraje de un viaje y las entradas
//! que usan los servicios para crearlo o modificarlo.
//! Mapea a la tabla trip_records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Un desplazamiento registrado de un vehículo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TripRecord {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub trip_reason: String,
    pub start_location: String,
    pub end_location: String,
    pub odometer_at_end: i64,
    pub traveled_distance: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Datos para registrar un nuevo viaje
#[derive(Debug, Clone)]
pub struct NewTripRecord {
    pub vehicle_id: Uuid,
    /// Si no se indica, el conductor es el usuario que registra el viaje
    pub driver_id: Option<Uuid>,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub trip_reason: String,
    pub start_location: String,
    pub end_location: String,
    pub odometer_at_end: i64,
}

/// Cambios sobre un viaje existente. Vehículo y conductor no se pueden modificar.
#[derive(Debug, Clone, Default)]
pub struct TripRecordPatch {
    pub departure_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub trip_reason: Option<String>,
    pub start_location: Option<String>,
    pub end_location: Option<String>,
    pub odometer_at_end: Option<i64>,
}

/// Grupos de campos tocados por una escritura
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckScope {
    pub dates: bool,
    pub odometer: bool,
}

impl CheckScope {
    pub const ALL: CheckScope = CheckScope {
        dates: true,
        odometer: true,
    };

    pub fn is_empty(&self) -> bool {
        !self.dates && !self.odometer
    }
}

impl TripRecord {
    /// Construye el registro a partir de la entrada; la distancia se deriva después
    pub fn from_new(input: NewTripRecord, acting_user: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            vehicle_id: input.vehicle_id,
            driver_id: input.driver_id.unwrap_or(acting_user),
            departure_date: input.departure_date,
            return_date: input.return_date,
            trip_reason: input.trip_reason,
            start_location: input.start_location,
            end_location: input.end_location,
            odometer_at_end: input.odometer_at_end,
            traveled_distance: input.odometer_at_end,
            created_at: now,
            updated_at: now,
        }
    }

    /// Aplica el patch y devuelve qué grupos de campos cambiaron de valor
    pub fn apply(&mut self, patch: TripRecordPatch, now: DateTime<Utc>) -> CheckScope {
        let mut scope = CheckScope {
            dates: false,
            odometer: false,
        };

        if let Some(date) = patch.departure_date {
            scope.dates |= date != self.departure_date;
            self.departure_date = date;
        }
        if let Some(date) = patch.return_date {
            scope.dates |= date != self.return_date;
            self.return_date = date;
        }
        if let Some(odometer) = patch.odometer_at_end {
            scope.odometer |= odometer != self.odometer_at_end;
            self.odometer_at_end = odometer;
        }
        if let Some(reason) = patch.trip_reason {
            self.trip_reason = reason;
        }
        if let Some(location) = patch.start_location {
            self.start_location = location;
        }
        if let Some(location) = patch.end_location {
            self.end_location = location;
        }

        self.updated_at = now;
        scope
    }
}

/// Filtro de búsqueda usado por el informe de kilometraje
#[derive(Debug, Clone)]
pub struct TripFilter {
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
    pub departure_from: NaiveDate,
    pub return_until: NaiveDate,
}

impl TripFilter {
    pub fn matches(&self, record: &TripRecord) -> bool {
        record.vehicle_id == self.vehicle_id
            && record.driver_id == self.driver_id
            && record.departure_date >= self.departure_from
            && record.return_date <= self.return_until
    }
}

/// Orden de listado por defecto: salida descendente, odómetro descendente
pub fn sort_newest_first(records: &mut [TripRecord]) {
    records.sort_by(|a, b| {
        (b.departure_date, b.odometer_at_end).cmp(&(a.departure_date, a.odometer_at_end))
    });
}

/// Conjunto de cambios que el repositorio aplica de forma atómica
#[derive(Debug, Clone, Default)]
pub struct TripChangeSet {
    pub upserts: Vec<TripRecord>,
    pub deletions: Vec<Uuid>,
}
