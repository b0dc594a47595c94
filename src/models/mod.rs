//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos del dominio de kilometraje
//! y las entradas que reciben los servicios.

pub mod report;
pub mod trip_record;
pub mod vehicle;

pub use report::{MileageReport, MileageReportQuery};
pub use trip_record::{
    CheckScope, NewTripRecord, TripChangeSet, TripFilter, TripRecord, TripRecordPatch,
};
pub use vehicle::{FleetStatus, NewVehicle, Vehicle, VehiclePatch, VehicleType};
