use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dto::trip_dto::TripResponse;
use crate::models::{MileageReport, MileageReportQuery};

// Parámetros de query del informe
#[derive(Debug, Deserialize)]
pub struct MileageReportParams {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
}

impl From<MileageReportParams> for MileageReportQuery {
    fn from(params: MileageReportParams) -> Self {
        MileageReportQuery {
            start_date: params.start_date,
            end_date: params.end_date,
            vehicle_id: params.vehicle_id,
            driver_id: params.driver_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MileageReportResponse {
    pub trips: Vec<TripResponse>,
    pub odometer_at_start: i64,
    pub odometer_at_end: i64,
    pub total_distance: i64,
}

impl From<MileageReport> for MileageReportResponse {
    fn from(report: MileageReport) -> Self {
        Self {
            trips: report.trips.into_iter().map(TripResponse::from).collect(),
            odometer_at_start: report.odometer_at_start,
            odometer_at_end: report.odometer_at_end,
            total_distance: report.total_distance,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OwnerGroupResponse {
    pub name: String,
    pub member_ids: Vec<Uuid>,
}
