//! Modelo del informe de kilometraje
//!
//! El informe no se persiste; se recalcula en cada consulta.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::models::trip_record::TripRecord;

/// Selección de viajes para el informe
#[derive(Debug, Clone)]
pub struct MileageReportQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
}

/// Resultado agregado del informe
#[derive(Debug, Clone, Serialize)]
pub struct MileageReport {
    /// Viajes seleccionados, del más reciente al más antiguo
    pub trips: Vec<TripRecord>,
    pub odometer_at_start: i64,
    pub odometer_at_end: i64,
    pub total_distance: i64,
}
