use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleResponse};
use crate::dto::ApiResponse;
use crate::services::VehicleService;
use crate::utils::errors::AppError;

pub struct VehicleController {
    service: Arc<VehicleService>,
}

impl VehicleController {
    pub fn new(service: Arc<VehicleService>) -> Self {
        Self { service }
    }

    pub async fn create(
        &self,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;
        let vehicle = self.service.create(request.into()).await?;

        Ok(ApiResponse::success_with_message(
            VehicleResponse::from(vehicle),
            "Vehículo creado exitosamente",
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<VehicleResponse, AppError> {
        let vehicle = self.service.get(id).await?;
        Ok(vehicle.into())
    }

    pub async fn list(&self, include_inactive: bool) -> Result<Vec<VehicleResponse>, AppError> {
        let vehicles = self.service.list(include_inactive).await?;
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;
        let vehicle = self.service.update(id, request.into()).await?;

        Ok(ApiResponse::success_with_message(
            VehicleResponse::from(vehicle),
            "Vehículo actualizado exitosamente",
        ))
    }

    pub async fn delete(&self, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        self.service.delete(id).await?;
        Ok(ApiResponse::message("Vehículo eliminado exitosamente"))
    }
}
