//! Servicio de vehículos
//!
//! Alta, modificación y baja de vehículos con validación de matrícula. Tras cada
//! escritura se ejecutan, en orden de registro, los hooks de vehículo.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use tracing::info;
use uuid::Uuid;

use crate::models::{NewVehicle, Vehicle, VehiclePatch};
use crate::repositories::VehicleRepository;
use crate::utils::errors::{not_found_error, AppError, AppResult, RuleViolation};
use crate::utils::validation::validate_registration_number;

/// Reacciones a cambios en vehículos
#[async_trait]
pub trait VehicleHook: Send + Sync {
    async fn after_create(&self, _created: &[Vehicle]) -> AppResult<()> {
        Ok(())
    }

    async fn after_update(&self, _updated: &[Vehicle]) -> AppResult<()> {
        Ok(())
    }

    /// Se ejecuta antes de borrar; un error cancela el borrado
    async fn before_delete(&self, _removed: &[Vehicle]) -> AppResult<()> {
        Ok(())
    }
}

pub struct VehicleService {
    repository: Arc<dyn VehicleRepository>,
    registration_pattern: Regex,
    hooks: Vec<Arc<dyn VehicleHook>>,
}

impl VehicleService {
    pub fn new(
        repository: Arc<dyn VehicleRepository>,
        registration_pattern: &str,
    ) -> AppResult<Self> {
        let registration_pattern = Regex::new(registration_pattern).map_err(|e| {
            AppError::Config(format!(
                "Invalid registration pattern '{}': {}",
                registration_pattern, e
            ))
        })?;

        Ok(Self {
            repository,
            registration_pattern,
            hooks: Vec::new(),
        })
    }

    /// Añade un hook al final de la lista
    pub fn with_hook(mut self, hook: Arc<dyn VehicleHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub async fn create(&self, input: NewVehicle) -> AppResult<Vehicle> {
        self.check_registration(&input.registration_number, None).await?;

        let vehicle = Vehicle::from_new(input, Utc::now());
        self.repository.insert_vehicle(&vehicle).await?;
        info!(
            vehicle_id = %vehicle.id,
            registration = %vehicle.registration_number,
            "Vehicle created"
        );

        for hook in &self.hooks {
            hook.after_create(std::slice::from_ref(&vehicle)).await?;
        }
        Ok(vehicle)
    }

    pub async fn update(&self, id: Uuid, patch: VehiclePatch) -> AppResult<Vehicle> {
        let mut vehicle = self.get(id).await?;

        if let Some(registration_number) = &patch.registration_number {
            if *registration_number != vehicle.registration_number {
                self.check_registration(registration_number, Some(id)).await?;
            }
        }

        vehicle.apply(patch, Utc::now());
        self.repository.update_vehicle(&vehicle).await?;
        info!(vehicle_id = %vehicle.id, "Vehicle updated");

        for hook in &self.hooks {
            hook.after_update(std::slice::from_ref(&vehicle)).await?;
        }
        Ok(vehicle)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let vehicle = self.get(id).await?;

        for hook in &self.hooks {
            hook.before_delete(std::slice::from_ref(&vehicle)).await?;
        }

        self.repository.delete_vehicle(id).await?;
        info!(vehicle_id = %id, "Vehicle deleted with its trip records");
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Vehicle> {
        self.repository
            .find_vehicle(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))
    }

    pub async fn list(&self, include_inactive: bool) -> AppResult<Vec<Vehicle>> {
        self.repository.list_vehicles(include_inactive).await
    }

    async fn check_registration(
        &self,
        registration_number: &str,
        exclude: Option<Uuid>,
    ) -> AppResult<()> {
        if validate_registration_number(registration_number, &self.registration_pattern).is_err() {
            return Err(RuleViolation::InvalidRegistrationFormat.into());
        }
        if self
            .repository
            .registration_exists(registration_number, exclude)
            .await?
        {
            return Err(RuleViolation::DuplicateRegistration.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VehicleType;
    use crate::repositories::InMemoryStore;
    use crate::utils::validation::DEFAULT_REGISTRATION_PATTERN;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingHook {
        events: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl VehicleHook for RecordingHook {
        async fn after_create(&self, created: &[Vehicle]) -> AppResult<()> {
            self.events
                .lock()
                .unwrap()
                .push(format!("create:{}", created[0].registration_number));
            Ok(())
        }

        async fn before_delete(&self, removed: &[Vehicle]) -> AppResult<()> {
            self.events
                .lock()
                .unwrap()
                .push(format!("delete:{}", removed[0].registration_number));
            Ok(())
        }
    }

    fn new_vehicle(registration: &str) -> NewVehicle {
        NewVehicle {
            registration_number: registration.to_string(),
            vehicle_type: VehicleType::LargeEngine,
            active: true,
            owner_ids: vec![],
        }
    }

    fn service(store: Arc<InMemoryStore>) -> VehicleService {
        VehicleService::new(store, DEFAULT_REGISTRATION_PATTERN).unwrap()
    }

    #[tokio::test]
    async fn rejects_malformed_registration() {
        let service = service(Arc::new(InMemoryStore::new()));
        let err = service.create(new_vehicle("KR 123")).await.unwrap_err();
        assert!(matches!(err, AppError::Rule(RuleViolation::InvalidRegistrationFormat)));
    }

    #[tokio::test]
    async fn rejects_duplicate_registration() {
        let service = service(Arc::new(InMemoryStore::new()));
        service.create(new_vehicle("KR12345")).await.unwrap();
        let err = service.create(new_vehicle("KR12345")).await.unwrap_err();
        assert!(matches!(err, AppError::Rule(RuleViolation::DuplicateRegistration)));
    }

    #[tokio::test]
    async fn update_keeping_own_registration_is_allowed() {
        let service = service(Arc::new(InMemoryStore::new()));
        let vehicle = service.create(new_vehicle("KR12345")).await.unwrap();
        let updated = service
            .update(
                vehicle.id,
                VehiclePatch {
                    registration_number: Some("KR12345".to_string()),
                    active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!updated.active);
    }

    #[tokio::test]
    async fn invalid_pattern_is_a_config_error() {
        let result = VehicleService::new(Arc::new(InMemoryStore::new()), "([");
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn hooks_run_in_registration_order() {
        let hook = Arc::new(RecordingHook::default());
        let service = service(Arc::new(InMemoryStore::new())).with_hook(hook.clone());

        let vehicle = service.create(new_vehicle("KR1")).await.unwrap();
        service.delete(vehicle.id).await.unwrap();

        let events = hook.events.lock().unwrap().clone();
        assert_eq!(events, vec!["create:KR1".to_string(), "delete:KR1".to_string()]);
    }

    #[tokio::test]
    async fn missing_vehicle_is_not_found() {
        let service = service(Arc::new(InMemoryStore::new()));
        let err = service.get(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
