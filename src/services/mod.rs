//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación: validación de
//! registros de kilometraje, derivación de distancias, grupo de propietarios
//! e informes.

pub mod distance;
pub mod mileage_service;
pub mod owner_group_sync;
pub mod preceding;
pub mod report_service;
pub mod trip_validator;
pub mod vehicle_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use mileage_service::MileageService;
pub use owner_group_sync::OwnerGroupSynchronizer;
pub use report_service::ReportService;
pub use vehicle_service::{VehicleHook, VehicleService};
