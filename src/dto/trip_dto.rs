use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{NewTripRecord, TripRecord, TripRecordPatch};
use crate::utils::validation::validate_not_blank;

// Request para registrar un viaje
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTripRequest {
    pub vehicle_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    #[validate(custom = "validate_not_blank", length(max = 256))]
    pub trip_reason: String,
    #[validate(custom = "validate_not_blank", length(max = 256))]
    pub start_location: String,
    #[validate(custom = "validate_not_blank", length(max = 256))]
    pub end_location: String,
    pub odometer_at_end: i64,
}

impl From<CreateTripRequest> for NewTripRecord {
    fn from(request: CreateTripRequest) -> Self {
        NewTripRecord {
            vehicle_id: request.vehicle_id,
            driver_id: request.driver_id,
            departure_date: request.departure_date,
            return_date: request.return_date,
            trip_reason: request.trip_reason,
            start_location: request.start_location,
            end_location: request.end_location,
            odometer_at_end: request.odometer_at_end,
        }
    }
}

// Request para registrar varios viajes de una vez
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTripBatchRequest {
    #[validate]
    pub trips: Vec<CreateTripRequest>,
}

// Request para modificar un viaje; vehículo y conductor son fijos
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateTripRequest {
    pub departure_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    #[validate(custom = "validate_not_blank", length(max = 256))]
    pub trip_reason: Option<String>,
    #[validate(custom = "validate_not_blank", length(max = 256))]
    pub start_location: Option<String>,
    #[validate(custom = "validate_not_blank", length(max = 256))]
    pub end_location: Option<String>,
    pub odometer_at_end: Option<i64>,
}

impl From<UpdateTripRequest> for TripRecordPatch {
    fn from(request: UpdateTripRequest) -> Self {
        TripRecordPatch {
            departure_date: request.departure_date,
            return_date: request.return_date,
            trip_reason: request.trip_reason,
            start_location: request.start_location,
            end_location: request.end_location,
            odometer_at_end: request.odometer_at_end,
        }
    }
}

// Response de viaje
#[derive(Debug, Serialize)]
pub struct TripResponse {
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

impl From<TripRecord> for TripResponse {
    fn from(trip: TripRecord) -> Self {
        Self {
            id: trip.id,
            vehicle_id: trip.vehicle_id,
            driver_id: trip.driver_id,
            departure_date: trip.departure_date,
            return_date: trip.return_date,
            trip_reason: trip.trip_reason,
            start_location: trip.start_location,
            end_location: trip.end_location,
            odometer_at_end: trip.odometer_at_end,
            traveled_distance: trip.traveled_distance,
            created_at: trip.created_at,
            updated_at: trip.updated_at,
        }
    }
}
