use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{TripChangeSet, TripFilter, TripRecord};
use crate::utils::errors::AppResult;

/// Acceso a los registros de kilometraje
#[async_trait]
pub trait TripRecordRepository: Send + Sync {
    async fn find_trip(&self, id: Uuid) -> AppResult<Option<TripRecord>>;

    /// Todos los registros del vehículo, del más reciente al más antiguo
    async fn trips_for_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<TripRecord>>;

    /// Registros que cumplen el filtro, del más reciente al más antiguo
    async fn search_trips(&self, filter: &TripFilter) -> AppResult<Vec<TripRecord>>;

    /// Aplica todas las altas, modificaciones y bajas o ninguna
    async fn apply_trip_changes(&self, changes: TripChangeSet) -> AppResult<()>;
}

pub struct PgTripRecordRepository {
    pool: PgPool,
}

impl PgTripRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TripRecordRepository for PgTripRecordRepository {
    async fn find_trip(&self, id: Uuid) -> AppResult<Option<TripRecord>> {
        let trip = sqlx::query_as::<_, TripRecord>("SELECT * FROM trip_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(trip)
    }

    async fn trips_for_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<TripRecord>> {
        let trips = sqlx::query_as::<_, TripRecord>(
            r#"
            SELECT * FROM trip_records
            WHERE vehicle_id = $1
            ORDER BY departure_date DESC, odometer_at_end DESC
            "#,
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(trips)
    }

    async fn search_trips(&self, filter: &TripFilter) -> AppResult<Vec<TripRecord>> {
        let trips = sqlx::query_as::<_, TripRecord>(
            r#"
            SELECT * FROM trip_records
            WHERE departure_date >= $1
              AND return_date <= $2
              AND vehicle_id = $3
              AND driver_id = $4
            ORDER BY departure_date DESC, odometer_at_end DESC
            "#,
        )
        .bind(filter.departure_from)
        .bind(filter.return_until)
        .bind(filter.vehicle_id)
        .bind(filter.driver_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(trips)
    }

    async fn apply_trip_changes(&self, changes: TripChangeSet) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        for id in &changes.deletions {
            sqlx::query("DELETE FROM trip_records WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        for trip in &changes.upserts {
            sqlx::query(
                r#"
                INSERT INTO trip_records (
                    id, vehicle_id, driver_id, departure_date, return_date, trip_reason,
                    start_location, end_location, odometer_at_end, traveled_distance,
                    created_at, updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                ON CONFLICT (id) DO UPDATE SET
                    departure_date = EXCLUDED.departure_date,
                    return_date = EXCLUDED.return_date,
                    trip_reason = EXCLUDED.trip_reason,
                    start_location = EXCLUDED.start_location,
                    end_location = EXCLUDED.end_location,
                    odometer_at_end = EXCLUDED.odometer_at_end,
                    traveled_distance = EXCLUDED.traveled_distance,
                    updated_at = EXCLUDED.updated_at
                "#,
            )
            .bind(trip.id)
            .bind(trip.vehicle_id)
            .bind(trip.driver_id)
            .bind(trip.departure_date)
            .bind(trip.return_date)
            .bind(&trip.trip_reason)
            .bind(&trip.start_location)
            .bind(&trip.end_location)
            .bind(trip.odometer_at_end)
            .bind(trip.traveled_distance)
            .bind(trip.created_at)
            .bind(trip.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
