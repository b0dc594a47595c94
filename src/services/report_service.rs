//! Informe de kilometraje
//!
//! Agrega los viajes de un vehículo y conductor en un rango de fechas.

use std::sync::Arc;

use tracing::debug;

use crate::models::{MileageReport, MileageReportQuery, TripFilter};
use crate::repositories::TripRecordRepository;
use crate::services::preceding::preceding_of;
use crate::utils::errors::AppResult;

pub struct ReportService {
    trips: Arc<dyn TripRecordRepository>,
}

impl ReportService {
    pub fn new(trips: Arc<dyn TripRecordRepository>) -> Self {
        Self { trips }
    }

    pub async fn generate(&self, query: &MileageReportQuery) -> AppResult<MileageReport> {
        let filter = TripFilter {
            vehicle_id: query.vehicle_id,
            driver_id: query.driver_id,
            departure_from: query.start_date,
            return_until: query.end_date,
        };
        let trips = self.trips.search_trips(&filter).await?;

        // El último de la lista es el viaje más antiguo del rango
        let odometer_at_start = match trips.last() {
            Some(earliest) => {
                let siblings = self.trips.trips_for_vehicle(earliest.vehicle_id).await?;
                preceding_of(&siblings, earliest)
                    .map(|previous| previous.odometer_at_end)
                    .unwrap_or(0)
            }
            None => 0,
        };
        let odometer_at_end = trips.iter().map(|t| t.odometer_at_end).max().unwrap_or(0);
        let total_distance = trips.iter().map(|t| t.traveled_distance).sum();

        debug!(
            vehicle_id = %query.vehicle_id,
            driver_id = %query.driver_id,
            trips = trips.len(),
            total_distance,
            "Mileage report generated"
        );

        Ok(MileageReport {
            trips,
            odometer_at_start,
            odometer_at_end,
            total_distance,
        })
    }
}
