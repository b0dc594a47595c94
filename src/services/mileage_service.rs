//! Servicio de registros de kilometraje
//!
//! Camino de escritura de los viajes: valida contra los registros del vehículo,
//! deriva las distancias y guarda todo en un único conjunto de cambios.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::trip_record::sort_newest_first;
use crate::models::{NewTripRecord, TripChangeSet, TripRecord, TripRecordPatch};
use crate::repositories::{TripRecordRepository, VehicleRepository};
use crate::services::distance::rederive_distances;
use crate::services::preceding::preceding_of;
use crate::services::trip_validator::{check_rederived, TripCandidate, TripValidator};
use crate::utils::errors::{not_found_error, AppError, AppResult};

type Today = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

pub struct MileageService {
    trips: Arc<dyn TripRecordRepository>,
    vehicles: Arc<dyn VehicleRepository>,
    today: Today,
}

impl MileageService {
    pub fn new(trips: Arc<dyn TripRecordRepository>, vehicles: Arc<dyn VehicleRepository>) -> Self {
        Self {
            trips,
            vehicles,
            today: Arc::new(|| Utc::now().date_naive()),
        }
    }

    /// Fija la fecha usada como "hoy" por la regla de fechas futuras
    pub fn with_today(mut self, today: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.today = Arc::new(today);
        self
    }

    fn validator(&self) -> TripValidator {
        TripValidator::new((self.today)())
    }

    pub async fn create_trip(
        &self,
        acting_user: Uuid,
        input: NewTripRecord,
    ) -> AppResult<TripRecord> {
        self.create_trips(acting_user, vec![input])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Internal("Trip record was not created".to_string()))
    }

    /// Registra varios viajes de forma atómica: si uno falla no se guarda ninguno
    pub async fn create_trips(
        &self,
        acting_user: Uuid,
        inputs: Vec<NewTripRecord>,
    ) -> AppResult<Vec<TripRecord>> {
        let now = Utc::now();
        let records: Vec<TripRecord> = inputs
            .into_iter()
            .map(|input| TripRecord::from_new(input, acting_user, now))
            .collect();

        let mut by_vehicle: BTreeMap<Uuid, Vec<TripCandidate>> = BTreeMap::new();
        for record in &records {
            by_vehicle
                .entry(record.vehicle_id)
                .or_default()
                .push(TripCandidate::created(record.clone()));
        }

        let validator = self.validator();
        let mut changes = TripChangeSet::default();
        for (vehicle_id, candidates) in by_vehicle {
            self.ensure_vehicle(vehicle_id).await?;

            let existing = self.trips.trips_for_vehicle(vehicle_id).await?;
            validator.validate(&existing, &candidates)?;

            let new_ids: HashSet<Uuid> = candidates.iter().map(|c| c.record.id).collect();
            let mut view = existing;
            view.extend(candidates.into_iter().map(|c| c.record));
            changes.upserts.extend(rederive_distances(&view, &new_ids));
        }

        let created: Vec<TripRecord> = records
            .iter()
            .filter_map(|record| changes.upserts.iter().find(|u| u.id == record.id).cloned())
            .collect();

        self.trips.apply_trip_changes(changes).await?;
        info!(count = created.len(), actor = %acting_user, "Trip records created");
        Ok(created)
    }

    pub async fn update_trip(&self, id: Uuid, patch: TripRecordPatch) -> AppResult<TripRecord> {
        let current = self.get_trip(id).await?;
        let mut updated = current.clone();
        let mut scope = updated.apply(patch, Utc::now());
        // Mover las fechas puede cambiar el registro anterior
        scope.odometer |= scope.dates;

        let existing = self.trips.trips_for_vehicle(current.vehicle_id).await?;
        if !scope.is_empty() {
            let candidate = TripCandidate {
                record: updated.clone(),
                scope,
            };
            self.validator().validate(&existing, &[candidate])?;
        }

        let mut view: Vec<TripRecord> = existing.into_iter().filter(|r| r.id != id).collect();
        view.push(updated);
        let forced: HashSet<Uuid> = [id].into_iter().collect();
        let upserts = rederive_distances(&view, &forced);
        if !scope.is_empty() {
            check_rederived(&view, &upserts)?;
        }

        let saved = upserts
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| not_found_error("Trip record", &id.to_string()))?;

        debug!(trip_id = %id, touched = upserts.len(), "Applying trip update");
        self.trips
            .apply_trip_changes(TripChangeSet {
                upserts,
                deletions: vec![],
            })
            .await?;
        info!(trip_id = %id, "Trip record updated");
        Ok(saved)
    }

    pub async fn delete_trip(&self, id: Uuid) -> AppResult<()> {
        let current = self.get_trip(id).await?;
        let view: Vec<TripRecord> = self
            .trips
            .trips_for_vehicle(current.vehicle_id)
            .await?
            .into_iter()
            .filter(|r| r.id != id)
            .collect();

        let upserts = rederive_distances(&view, &HashSet::new());
        self.trips
            .apply_trip_changes(TripChangeSet {
                upserts,
                deletions: vec![id],
            })
            .await?;
        info!(trip_id = %id, "Trip record deleted");
        Ok(())
    }

    pub async fn get_trip(&self, id: Uuid) -> AppResult<TripRecord> {
        self.trips
            .find_trip(id)
            .await?
            .ok_or_else(|| not_found_error("Trip record", &id.to_string()))
    }

    /// Registros del vehículo en el orden de listado por defecto
    pub async fn trips_for_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<TripRecord>> {
        self.ensure_vehicle(vehicle_id).await?;
        let mut trips = self.trips.trips_for_vehicle(vehicle_id).await?;
        sort_newest_first(&mut trips);
        Ok(trips)
    }

    /// Registro inmediatamente anterior al indicado dentro de su vehículo
    pub async fn preceding_trip(&self, id: Uuid) -> AppResult<Option<TripRecord>> {
        let trip = self.get_trip(id).await?;
        let siblings = self.trips.trips_for_vehicle(trip.vehicle_id).await?;
        Ok(preceding_of(&siblings, &trip).cloned())
    }

    async fn ensure_vehicle(&self, vehicle_id: Uuid) -> AppResult<()> {
        if self.vehicles.find_vehicle(vehicle_id).await?.is_none() {
            return Err(not_found_error("Vehicle", &vehicle_id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewVehicle, Vehicle, VehicleType};
    use crate::repositories::InMemoryStore;
    use crate::services::test_support::date;
    use crate::utils::errors::RuleViolation;

    struct Fixture {
        service: MileageService,
        vehicle: Vehicle,
        driver: Uuid,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let vehicle = Vehicle::from_new(
            NewVehicle {
                registration_number: "KR12345".to_string(),
                vehicle_type: VehicleType::LargeEngine,
                active: true,
                owner_ids: vec![],
            },
            Utc::now(),
        );
        store.insert_vehicle(&vehicle).await.unwrap();
        let service =
            MileageService::new(store.clone(), store.clone()).with_today(|| date("2024-06-30"));
        Fixture {
            service,
            vehicle,
            driver: Uuid::new_v4(),
        }
    }

    fn new_trip(vehicle_id: Uuid, day: &str, odometer: i64) -> NewTripRecord {
        NewTripRecord {
            vehicle_id,
            driver_id: None,
            departure_date: date(day),
            return_date: date(day),
            trip_reason: "client visit".to_string(),
            start_location: "Krakow".to_string(),
            end_location: "Tarnow".to_string(),
            odometer_at_end: odometer,
        }
    }

    #[tokio::test]
    async fn derives_distance_on_create() {
        let f = fixture().await;
        let first = f
            .service
            .create_trip(f.driver, new_trip(f.vehicle.id, "2024-01-10", 100))
            .await
            .unwrap();
        let second = f
            .service
            .create_trip(f.driver, new_trip(f.vehicle.id, "2024-01-12", 150))
            .await
            .unwrap();

        assert_eq!(first.traveled_distance, 100);
        assert_eq!(second.traveled_distance, 50);
        assert_eq!(first.driver_id, f.driver);
    }

    #[tokio::test]
    async fn rejects_out_of_order_insertion() {
        let f = fixture().await;
        f.service
            .create_trip(f.driver, new_trip(f.vehicle.id, "2024-01-10", 100))
            .await
            .unwrap();
        f.service
            .create_trip(f.driver, new_trip(f.vehicle.id, "2024-01-12", 150))
            .await
            .unwrap();

        let err = f
            .service
            .create_trip(f.driver, new_trip(f.vehicle.id, "2024-01-11", 120))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Rule(RuleViolation::OutOfOrderInsertion)));
        assert_eq!(f.service.trips_for_vehicle(f.vehicle.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failed_batch_saves_nothing() {
        let f = fixture().await;
        let err = f
            .service
            .create_trips(
                f.driver,
                vec![
                    new_trip(f.vehicle.id, "2024-01-10", 100),
                    new_trip(f.vehicle.id, "2024-01-12", 0),
                ],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Rule(RuleViolation::NonPositiveOdometer)));
        assert!(f.service.trips_for_vehicle(f.vehicle.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn batch_is_saved_with_derived_distances() {
        let f = fixture().await;
        let created = f
            .service
            .create_trips(
                f.driver,
                vec![
                    new_trip(f.vehicle.id, "2024-01-12", 150),
                    new_trip(f.vehicle.id, "2024-01-10", 100),
                ],
            )
            .await
            .unwrap();
        let distances: Vec<i64> = created.iter().map(|t| t.traveled_distance).collect();
        assert_eq!(distances, vec![50, 100]);
    }

    #[tokio::test]
    async fn unknown_vehicle_is_not_found() {
        let f = fixture().await;
        let err = f
            .service
            .create_trip(f.driver, new_trip(Uuid::new_v4(), "2024-01-10", 100))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn editing_odometer_refreshes_successor_distance() {
        let f = fixture().await;
        let first = f
            .service
            .create_trip(f.driver, new_trip(f.vehicle.id, "2024-01-10", 100))
            .await
            .unwrap();
        let second = f
            .service
            .create_trip(f.driver, new_trip(f.vehicle.id, "2024-01-12", 150))
            .await
            .unwrap();

        let edited = f
            .service
            .update_trip(
                first.id,
                TripRecordPatch {
                    odometer_at_end: Some(120),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(edited.traveled_distance, 120);
        let successor = f.service.get_trip(second.id).await.unwrap();
        assert_eq!(successor.traveled_distance, 30);
    }

    #[tokio::test]
    async fn editing_odometer_above_successor_is_rejected() {
        let f = fixture().await;
        let first = f
            .service
            .create_trip(f.driver, new_trip(f.vehicle.id, "2024-01-10", 100))
            .await
            .unwrap();
        let second = f
            .service
            .create_trip(f.driver, new_trip(f.vehicle.id, "2024-01-12", 150))
            .await
            .unwrap();

        let err = f
            .service
            .update_trip(
                first.id,
                TripRecordPatch {
                    odometer_at_end: Some(200),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Rule(RuleViolation::OdometerRegression)));

        let stored_first = f.service.get_trip(first.id).await.unwrap();
        let stored_second = f.service.get_trip(second.id).await.unwrap();
        assert_eq!(stored_first.odometer_at_end, 100);
        assert_eq!(stored_second.traveled_distance, 50);
    }

    #[tokio::test]
    async fn moving_a_trip_after_a_higher_reading_is_rejected() {
        let f = fixture().await;
        let morning = f
            .service
            .create_trip(f.driver, new_trip(f.vehicle.id, "2024-01-10", 100))
            .await
            .unwrap();
        f.service
            .create_trip(f.driver, new_trip(f.vehicle.id, "2024-01-10", 200))
            .await
            .unwrap();

        let err = f
            .service
            .update_trip(
                morning.id,
                TripRecordPatch {
                    departure_date: Some(date("2024-01-11")),
                    return_date: Some(date("2024-01-11")),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Rule(RuleViolation::OdometerRegression)));

        let stored = f.service.get_trip(morning.id).await.unwrap();
        assert_eq!(stored.departure_date, date("2024-01-10"));
        assert_eq!(stored.traveled_distance, 100);
    }

    #[tokio::test]
    async fn editing_text_of_an_older_trip_is_allowed() {
        let f = fixture().await;
        let first = f
            .service
            .create_trip(f.driver, new_trip(f.vehicle.id, "2024-01-10", 100))
            .await
            .unwrap();
        f.service
            .create_trip(f.driver, new_trip(f.vehicle.id, "2024-01-12", 150))
            .await
            .unwrap();

        let edited = f
            .service
            .update_trip(
                first.id,
                TripRecordPatch {
                    trip_reason: Some("fuel".to_string()),
                    departure_date: Some(date("2024-01-10")),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(edited.trip_reason, "fuel");
    }

    #[tokio::test]
    async fn deleting_a_trip_refreshes_successor_distance() {
        let f = fixture().await;
        f.service
            .create_trip(f.driver, new_trip(f.vehicle.id, "2024-01-10", 100))
            .await
            .unwrap();
        let middle = f
            .service
            .create_trip(f.driver, new_trip(f.vehicle.id, "2024-01-11", 130))
            .await
            .unwrap();
        let last = f
            .service
            .create_trip(f.driver, new_trip(f.vehicle.id, "2024-01-12", 150))
            .await
            .unwrap();
        assert_eq!(last.traveled_distance, 20);

        f.service.delete_trip(middle.id).await.unwrap();

        assert_eq!(f.service.get_trip(last.id).await.unwrap().traveled_distance, 50);
    }

    #[tokio::test]
    async fn preceding_trip_follows_vehicle_order() {
        let f = fixture().await;
        let first = f
            .service
            .create_trip(f.driver, new_trip(f.vehicle.id, "2024-01-10", 100))
            .await
            .unwrap();
        let second = f
            .service
            .create_trip(f.driver, new_trip(f.vehicle.id, "2024-01-10", 140))
            .await
            .unwrap();

        let previous = f.service.preceding_trip(second.id).await.unwrap();
        assert_eq!(previous.map(|t| t.id), Some(first.id));
        assert!(f.service.preceding_trip(first.id).await.unwrap().is_none());
    }
}
