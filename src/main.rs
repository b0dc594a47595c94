use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use fleet_mileage::config::{DatabaseConfig, EnvironmentConfig, StorageBackend};
use fleet_mileage::database::DatabaseConnection;
use fleet_mileage::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.tracing_level())
        .init();

    info!("🚗 Fleet Mileage - registro de kilometraje");
    info!("================================================");
    info!("🌍 Entorno: {}", config.environment);
    if config.is_development() && config.cors_origins.is_empty() {
        info!("🛠️ Modo desarrollo sin CORS_ORIGINS: CORS permisivo");
    }

    let app_state = match config.storage_backend {
        StorageBackend::Postgres => {
            // Inicializar base de datos
            let database_config = DatabaseConfig::from_env()?;
            let db_connection = match DatabaseConnection::connect(&database_config).await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {}", e);
                    return Err(anyhow::anyhow!("Error de base de datos: {}", e));
                }
            };
            AppState::postgres(db_connection.pool().clone(), config.clone())?
        }
        StorageBackend::Memory => {
            info!("🧠 Usando almacenamiento en memoria; los datos se pierden al reiniciar");
            AppState::in_memory(config.clone())?
        }
    };

    let app = create_router(app_state);
    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Estado del servicio");
    info!("🚗 Vehículos:");
    info!("   POST /api/vehicles - Crear vehículo");
    info!("   GET  /api/vehicles - Listar vehículos (?include_inactive=true)");
    info!("   GET|PUT|DELETE /api/vehicles/:id - Obtener / actualizar / eliminar");
    info!("   GET  /api/vehicles/:id/trips - Viajes del vehículo");
    info!("🛣️ Viajes:");
    info!("   POST /api/trips - Registrar viaje (header x-user-id)");
    info!("   POST /api/trips/batch - Registrar varios viajes");
    info!("   GET|PUT|DELETE /api/trips/:id - Obtener / actualizar / eliminar");
    info!("   GET  /api/trips/:id/preceding - Viaje anterior");
    info!("📊 Informes:");
    info!("   GET  /api/reports/mileage - Informe de kilometraje");
    info!("   GET  /api/owner-group - Grupo de propietarios");

    // Iniciar servidor en background
    let server_handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("❌ Error del servidor: {}", e);
                e
            })
    });

    // Esperar a que el servidor termine
    if let Err(e) = server_handle.await? {
        error!("❌ Servidor terminó con error: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el manejador de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el manejador de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
