//! Configuración de conexión a PostgreSQL
//!
//! Este módulo abre el pool de conexiones y aplica las migraciones embebidas.

use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::utils::errors::AppResult;

/// Pool de PostgreSQL ya migrado
#[derive(Clone)]
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Conectar y ejecutar las migraciones pendientes
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        info!("🗄️ Conectando a {}", mask_database_url(&config.url));
        let pool = config.create_pool().await?;
        run_migrations(&pool).await?;
        info!("✅ Base de datos lista");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Ejecutar migraciones de la base de datos
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Función helper para enmascarar la URL de la base de datos en logs
fn mask_database_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if url[..at_pos].rfind(':').is_some() {
            let protocol = &url[..url.find("://").map(|p| p + 3).unwrap_or(0)];
            let host = &url[at_pos + 1..];
            format!("{}***:***@{}", protocol, host)
        } else {
            url.to_string()
        }
    } else {
        url.to_string()
    }
}
