use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Vehicle;
use crate::utils::errors::{AppError, AppResult, RuleViolation};

/// El único índice único de `vehicles` además de la clave es la matrícula
fn registration_conflict(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RuleViolation::DuplicateRegistration.into()
        }
        _ => err.into(),
    }
}

/// Acceso a la colección de vehículos
#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn insert_vehicle(&self, vehicle: &Vehicle) -> AppResult<()>;

    async fn update_vehicle(&self, vehicle: &Vehicle) -> AppResult<()>;

    /// Elimina el vehículo y, en cascada, sus registros de kilometraje
    async fn delete_vehicle(&self, id: Uuid) -> AppResult<()>;

    async fn find_vehicle(&self, id: Uuid) -> AppResult<Option<Vehicle>>;

    async fn list_vehicles(&self, include_inactive: bool) -> AppResult<Vec<Vehicle>>;

    async fn registration_exists(
        &self,
        registration_number: &str,
        exclude: Option<Uuid>,
    ) -> AppResult<bool>;
}

pub struct PgVehicleRepository {
    pool: PgPool,
}

impl PgVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VehicleRepository for PgVehicleRepository {
    async fn insert_vehicle(&self, vehicle: &Vehicle) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO vehicles (id, registration_number, vehicle_type, active, owner_ids, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(vehicle.id)
        .bind(&vehicle.registration_number)
        .bind(vehicle.vehicle_type)
        .bind(vehicle.active)
        .bind(&vehicle.owner_ids)
        .bind(vehicle.created_at)
        .bind(vehicle.updated_at)
        .execute(&self.pool)
        .await
        .map_err(registration_conflict)?;

        Ok(())
    }

    async fn update_vehicle(&self, vehicle: &Vehicle) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE vehicles
            SET registration_number = $2, vehicle_type = $3, active = $4, owner_ids = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(vehicle.id)
        .bind(&vehicle.registration_number)
        .bind(vehicle.vehicle_type)
        .bind(vehicle.active)
        .bind(&vehicle.owner_ids)
        .bind(vehicle.updated_at)
        .execute(&self.pool)
        .await
        .map_err(registration_conflict)?;

        Ok(())
    }

    async fn delete_vehicle(&self, id: Uuid) -> AppResult<()> {
        // trip_records.vehicle_id es ON DELETE CASCADE
        sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_vehicle(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    async fn list_vehicles(&self, include_inactive: bool) -> AppResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE active OR $1 ORDER BY registration_number",
        )
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    async fn registration_exists(
        &self,
        registration_number: &str,
        exclude: Option<Uuid>,
    ) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM vehicles
                WHERE registration_number = $1 AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(registration_number)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }
}
