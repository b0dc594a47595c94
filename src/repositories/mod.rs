//! Repositorios
//!
//! Traits de persistencia y sus implementaciones sobre PostgreSQL y en memoria.

pub mod memory;
pub mod owner_group_repository;
pub mod trip_record_repository;
pub mod vehicle_repository;

pub use memory::InMemoryStore;
pub use owner_group_repository::{OwnerGroupRepository, PgOwnerGroupRepository};
pub use trip_record_repository::{PgTripRecordRepository, TripRecordRepository};
pub use vehicle_repository::{PgVehicleRepository, VehicleRepository};
