//! DTOs de la API
//!
//! Tipos de entrada y salida de los endpoints HTTP.

pub mod api_response;
pub mod report_dto;
pub mod trip_dto;
pub mod vehicle_dto;

pub use api_response::ApiResponse;
