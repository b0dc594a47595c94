use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::dto::trip_dto::{
    CreateTripBatchRequest, CreateTripRequest, TripResponse, UpdateTripRequest,
};
use crate::dto::ApiResponse;
use crate::models::NewTripRecord;
use crate::services::MileageService;
use crate::utils::errors::{bad_request_error, AppError};

pub struct MileageController {
    service: Arc<MileageService>,
}

impl MileageController {
    pub fn new(service: Arc<MileageService>) -> Self {
        Self { service }
    }

    pub async fn create(
        &self,
        acting_user: Uuid,
        request: CreateTripRequest,
    ) -> Result<ApiResponse<TripResponse>, AppError> {
        request.validate()?;
        let trip = self.service.create_trip(acting_user, request.into()).await?;

        Ok(ApiResponse::success_with_message(
            TripResponse::from(trip),
            "Viaje registrado exitosamente",
        ))
    }

    pub async fn create_batch(
        &self,
        acting_user: Uuid,
        request: CreateTripBatchRequest,
    ) -> Result<ApiResponse<Vec<TripResponse>>, AppError> {
        if request.trips.is_empty() {
            return Err(bad_request_error("Se requiere al menos un viaje"));
        }
        request.validate()?;

        let inputs: Vec<NewTripRecord> =
            request.trips.into_iter().map(NewTripRecord::from).collect();
        let trips = self.service.create_trips(acting_user, inputs).await?;
        let count = trips.len();

        Ok(ApiResponse::success_with_message(
            trips.into_iter().map(TripResponse::from).collect(),
            format!("{} viajes registrados exitosamente", count),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<TripResponse, AppError> {
        Ok(self.service.get_trip(id).await?.into())
    }

    pub async fn list_for_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<TripResponse>, AppError> {
        let trips = self.service.trips_for_vehicle(vehicle_id).await?;
        Ok(trips.into_iter().map(TripResponse::from).collect())
    }

    pub async fn preceding(&self, id: Uuid) -> Result<Option<TripResponse>, AppError> {
        Ok(self.service.preceding_trip(id).await?.map(TripResponse::from))
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateTripRequest,
    ) -> Result<ApiResponse<TripResponse>, AppError> {
        request.validate()?;
        let trip = self.service.update_trip(id, request.into()).await?;

        Ok(ApiResponse::success_with_message(
            TripResponse::from(trip),
            "Viaje actualizado exitosamente",
        ))
    }

    pub async fn delete(&self, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        self.service.delete_trip(id).await?;
        Ok(ApiResponse::message("Viaje eliminado exitosamente"))
    }
}
