//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Reglas de negocio violadas al escribir un registro de kilometraje o un vehículo.
///
/// Cada variante llega al cliente con su propio código para que la interfaz
/// pueda mostrar un mensaje específico.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleViolation {
    #[error("You cannot input mileage with a date preceding the last entry")]
    OutOfOrderInsertion,

    #[error("The departure date cannot be later than the return date.")]
    InvalidDateRange,

    #[error("Trip dates cannot be in the future.")]
    FutureDateNotAllowed,

    #[error("A record with an earlier date has a higher odometer reading, which is inconsistent.")]
    OdometerRegression,

    #[error("Mileage distance can't be shorter than 1 km.")]
    TripTooShort,

    #[error("The odometer reading cannot be negative.")]
    NonPositiveOdometer,

    #[error("This registration number already exists. Please enter a unique one.")]
    DuplicateRegistration,

    #[error("The registration number is invalid. It must be up to 15 letters, digits or hyphens.")]
    InvalidRegistrationFormat,
}

impl RuleViolation {
    /// Código estable expuesto en las respuestas de error
    pub fn code(&self) -> &'static str {
        match self {
            RuleViolation::OutOfOrderInsertion => "OUT_OF_ORDER_INSERTION",
            RuleViolation::InvalidDateRange => "INVALID_DATE_RANGE",
            RuleViolation::FutureDateNotAllowed => "FUTURE_DATE_NOT_ALLOWED",
            RuleViolation::OdometerRegression => "ODOMETER_REGRESSION",
            RuleViolation::TripTooShort => "TRIP_TOO_SHORT",
            RuleViolation::NonPositiveOdometer => "NON_POSITIVE_ODOMETER",
            RuleViolation::DuplicateRegistration => "DUPLICATE_REGISTRATION",
            RuleViolation::InvalidRegistrationFormat => "INVALID_REGISTRATION_FORMAT",
        }
    }
}

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Rule(#[from] RuleViolation),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Database Error".to_string(),
                        message: "An error occurred while accessing the database".to_string(),
                        details: Some(json!({ "sql_error": e.to_string() })),
                        code: Some("DB_ERROR".to_string()),
                    },
                )
            }

            AppError::Migration(e) => {
                tracing::error!("Migration error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Database Error".to_string(),
                        message: "The database schema could not be prepared".to_string(),
                        details: None,
                        code: Some("DB_MIGRATION_ERROR".to_string()),
                    },
                )
            }

            AppError::Validation(e) => {
                tracing::warn!("Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation Error".to_string(),
                        message: "The provided data is invalid".to_string(),
                        details: Some(json!(e)),
                        code: Some("VALIDATION_ERROR".to_string()),
                    },
                )
            }

            AppError::Rule(violation) => {
                tracing::warn!(code = violation.code(), "Rule violation: {}", violation);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorResponse {
                        error: "Rule Violation".to_string(),
                        message: violation.to_string(),
                        details: None,
                        code: Some(violation.code().to_string()),
                    },
                )
            }

            AppError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized access: {}", msg);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse {
                        error: "Unauthorized".to_string(),
                        message: msg,
                        details: None,
                        code: Some("UNAUTHORIZED".to_string()),
                    },
                )
            }

            AppError::NotFound(msg) => {
                tracing::info!("Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error: "Not Found".to_string(),
                        message: msg,
                        details: None,
                        code: Some("NOT_FOUND".to_string()),
                    },
                )
            }

            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Bad Request".to_string(),
                        message: msg,
                        details: None,
                        code: Some("BAD_REQUEST".to_string()),
                    },
                )
            }

            AppError::Config(msg) | AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        message: "An unexpected error occurred".to_string(),
                        details: Some(json!({ "internal_error": msg })),
                        code: Some("INTERNAL_ERROR".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de solicitud incorrecta
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_violations_keep_distinct_codes() {
        let all = [
            RuleViolation::OutOfOrderInsertion,
            RuleViolation::InvalidDateRange,
            RuleViolation::FutureDateNotAllowed,
            RuleViolation::OdometerRegression,
            RuleViolation::TripTooShort,
            RuleViolation::NonPositiveOdometer,
            RuleViolation::DuplicateRegistration,
            RuleViolation::InvalidRegistrationFormat,
        ];
        let codes: std::collections::HashSet<_> = all.iter().map(|v| v.code()).collect();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn rule_violation_renders_as_unprocessable_entity() {
        let response = AppError::from(RuleViolation::TripTooShort).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn not_found_helper_mentions_resource() {
        let err = not_found_error("Vehicle", "abc");
        assert_eq!(err.to_string(), "Not found: Vehicle with id 'abc' not found");
    }
}
