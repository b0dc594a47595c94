use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{FleetStatus, NewVehicle, Vehicle, VehiclePatch, VehicleType};
use crate::utils::validation::validate_not_blank;

fn default_active() -> bool {
    true
}

// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(custom = "validate_not_blank", length(max = 64))]
    pub registration_number: String,
    pub vehicle_type: VehicleType,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub owner_ids: Vec<Uuid>,
}

impl From<CreateVehicleRequest> for NewVehicle {
    fn from(request: CreateVehicleRequest) -> Self {
        NewVehicle {
            registration_number: request.registration_number.trim().to_string(),
            vehicle_type: request.vehicle_type,
            active: request.active,
            owner_ids: request.owner_ids,
        }
    }
}

// Request para actualizar un vehículo
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(custom = "validate_not_blank", length(max = 64))]
    pub registration_number: Option<String>,
    pub vehicle_type: Option<VehicleType>,
    pub active: Option<bool>,
    pub owner_ids: Option<Vec<Uuid>>,
}

impl From<UpdateVehicleRequest> for VehiclePatch {
    fn from(request: UpdateVehicleRequest) -> Self {
        VehiclePatch {
            registration_number: request.registration_number.map(|r| r.trim().to_string()),
            vehicle_type: request.vehicle_type,
            active: request.active,
            owner_ids: request.owner_ids,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListVehiclesQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

// Response de vehículo
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: Uuid,
    pub registration_number: String,
    pub vehicle_type: VehicleType,
    pub active: bool,
    pub status: FleetStatus,
    pub owner_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        let status = vehicle.status();
        Self {
            id: vehicle.id,
            registration_number: vehicle.registration_number,
            vehicle_type: vehicle.vehicle_type,
            active: vehicle.active,
            status,
            owner_ids: vehicle.owner_ids,
            created_at: vehicle.created_at,
            updated_at: vehicle.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_defaults_to_active_without_owners() {
        let json = r#"{"registration_number":"KR12345","vehicle_type":"gt9"}"#;
        let request: CreateVehicleRequest = serde_json::from_str(json).unwrap();
        assert!(request.active);
        assert!(request.owner_ids.is_empty());
        assert_eq!(request.vehicle_type, VehicleType::LargeEngine);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn blank_registration_fails_validation() {
        let request: CreateVehicleRequest =
            serde_json::from_str(r#"{"registration_number":"  ","vehicle_type":"mb"}"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn response_exposes_fleet_status() {
        let vehicle = Vehicle::from_new(
            NewVehicle {
                registration_number: "KR1".to_string(),
                vehicle_type: VehicleType::Scooter,
                active: false,
                owner_ids: vec![],
            },
            Utc::now(),
        );
        let json = serde_json::to_value(VehicleResponse::from(vehicle)).unwrap();
        assert_eq!(json["status"], "off");
        assert_eq!(json["vehicle_type"], "sct");
    }
}
