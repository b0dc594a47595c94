//! Helpers compartidos por los tests de servicios

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::models::TripRecord;

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

/// Viaje de un solo día con el odómetro indicado
pub fn trip(vehicle_id: Uuid, departure: &str, odometer_at_end: i64) -> TripRecord {
    trip_span(vehicle_id, departure, departure, odometer_at_end)
}

pub fn trip_span(
    vehicle_id: Uuid,
    departure: &str,
    return_date: &str,
    odometer_at_end: i64,
) -> TripRecord {
    let now = Utc::now();
    TripRecord {
        id: Uuid::new_v4(),
        vehicle_id,
        driver_id: Uuid::nil(),
        departure_date: date(departure),
        return_date: date(return_date),
        trip_reason: "client visit".to_string(),
        start_location: "Krakow".to_string(),
        end_location: "Tarnow".to_string(),
        odometer_at_end,
        traveled_distance: odometer_at_end,
        created_at: now,
        updated_at: now,
    }
}
