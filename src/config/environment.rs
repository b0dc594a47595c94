//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;
use std::str::FromStr;

use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::DEFAULT_REGISTRATION_PATTERN;

pub const DEFAULT_OWNER_GROUP_NAME: &str = "car_owners";

/// Backend de almacenamiento
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(AppError::Config(format!("Unknown STORAGE_BACKEND '{}'", other))),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub storage_backend: StorageBackend,
    pub registration_pattern: String,
    pub owner_group_name: String,
    pub cors_origins: Vec<String>,
    pub log_level: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            storage_backend: StorageBackend::Postgres,
            registration_pattern: DEFAULT_REGISTRATION_PATTERN.to_string(),
            owner_group_name: DEFAULT_OWNER_GROUP_NAME.to_string(),
            cors_origins: Vec::new(),
            log_level: "debug".to_string(),
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración desde las variables de entorno
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| {
                AppError::Config(format!("PORT must be a valid number, got '{}'", raw))
            })?,
            Err(_) => defaults.port,
        };
        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.storage_backend,
        };

        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            port,
            host: env::var("HOST").unwrap_or(defaults.host),
            storage_backend,
            registration_pattern: env::var("REGISTRATION_PATTERN")
                .unwrap_or(defaults.registration_pattern),
            owner_group_name: env::var("OWNER_GROUP_NAME").unwrap_or(defaults.owner_group_name),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .unwrap_or(defaults.cors_origins),
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Nivel de log para el subscriber; cae a DEBUG si no se reconoce
    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::DEBUG)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
