mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use config::environment::EnvironmentConfig;
use database::DatabaseConnection;
use dotenvy::dotenv;
use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🏁 KartControl - Gestión de reservas del circuito");
    info!("=================================================");

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let pool = db_connection.pool().clone();

    // Crear router de la API
    let config = EnvironmentConfig::default();
    let app_state = AppState::new(pool, config.clone());

    // CORS: permisivo solo en desarrollo sin orígenes configurados
    let cors = if config.is_development() && config.cors_origins.is_empty() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(config.cors_origins.clone())
    };

    let app = Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", routes::auth_routes::create_auth_router(app_state.clone()))
        .nest("/api/user", routes::user_routes::create_user_router(app_state.clone()))
        .nest("/api/track", routes::track_routes::create_track_router(app_state.clone()))
        .nest("/api/session", routes::session_routes::create_session_router(app_state.clone()))
        .nest("/api/kart", routes::kart_routes::create_kart_router(app_state.clone()))
        .nest("/api/booking", routes::booking_routes::create_booking_router(app_state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(app_state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔐 Autenticación:");
    info!("   POST /api/auth/register - Registro de driver");
    info!("   POST /api/auth/login - Login");
    info!("   GET  /api/auth/me - Usuario actual");
    info!("   PUT  /api/user/:id/role - Cambiar rol (manager)");
    info!("🏟️ Circuito:");
    info!("   GET  /api/track - Datos del circuito");
    info!("   POST /api/track - Crear circuito (manager, único)");
    info!("   PUT  /api/track - Actualizar circuito (manager)");
    info!("📅 Sesiones:");
    info!("   GET  /api/session - Listar sesiones con disponibilidad");
    info!("   GET  /api/session/:id - Detalle de sesión");
    info!("   POST /api/session - Crear sesión (manager)");
    info!("   PUT  /api/session/:id - Actualizar sesión (manager)");
    info!("   DELETE /api/session/:id - Eliminar sesión (manager)");
    info!("   POST /api/session/schedule - Generar calendario (manager)");
    info!("🏎️ Karts:");
    info!("   GET  /api/kart - Listar flota (manager)");
    info!("   POST /api/kart - Alta de kart (manager)");
    info!("   PUT  /api/kart/:id - Estado/notas de kart (manager)");
    info!("   DELETE /api/kart/:id - Baja de kart (manager)");
    info!("📋 Reservas:");
    info!("   POST /api/booking - Crear reserva (driver)");
    info!("   GET  /api/booking - Listar reservas");
    info!("   GET  /api/booking/:id - Detalle de reserva");
    info!("   POST /api/booking/:id/confirm - Confirmar y asignar kart (manager)");
    info!("   POST /api/booking/:id/cancel - Cancelar reserva");
    info!("   POST /api/booking/:id/complete - Completar reserva (manager)");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "service": "kartcontrol",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
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
