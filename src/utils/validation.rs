//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! usadas por los DTOs y los servicios.

use regex::Regex;
use validator::ValidationError;

/// Patrón permisivo por defecto para matrículas: hasta 15 letras, dígitos o guiones
pub const DEFAULT_REGISTRATION_PATTERN: &str = r"^[A-Za-z0-9-]{1,15}$";

/// Validar que un string no esté vacío
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de matrícula de vehículo contra el patrón configurado
pub fn validate_registration_number(value: &str, pattern: &Regex) -> Result<(), ValidationError> {
    if !pattern.is_match(value) {
        let mut error = ValidationError::new("registration_number");
        error.add_param("value".into(), &value.to_string());
        error.add_param("pattern".into(), &pattern.as_str().to_string());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Warsaw").is_ok());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("").is_err());
    }

    #[test]
    fn test_default_registration_pattern() {
        let pattern = Regex::new(DEFAULT_REGISTRATION_PATTERN).unwrap();
        assert!(validate_registration_number("KR-12345", &pattern).is_ok());
        assert!(validate_registration_number("wx1234a", &pattern).is_ok());
        assert!(validate_registration_number("", &pattern).is_err());
        assert!(validate_registration_number("KR 12345", &pattern).is_err());
        assert!(validate_registration_number("ABCDEFGHIJ123456", &pattern).is_err());
    }

    #[test]
    fn test_strict_registration_pattern() {
        let pattern = Regex::new(r"^[A-Z]{2,3}[A-Z0-9]{1,5}$").unwrap();
        assert!(validate_registration_number("WX1234A", &pattern).is_ok());
        assert!(validate_registration_number("W1234", &pattern).is_err());
    }
}
