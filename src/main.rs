use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use delivery_fee::config::environment::EnvironmentConfig;
use delivery_fee::routes::create_app;
use delivery_fee::services::Origin;
use delivery_fee::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = match EnvironmentConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuración inválida: {}", e);
            return Err(anyhow::anyhow!("Error de configuración: {}", e));
        }
    };

    // Configurar logging
    let level = config
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🚚 Delivery Fee Calculator");
    info!("================================================");
    info!("🏷️ Environment: {}", config.environment);
    match &config.origin {
        Origin::Fixed(coordinate) => info!("📍 Origin: {}", coordinate),
        Origin::Address(address) => info!("📍 Origin address: {}", address),
    }
    info!(
        "🧾 Profile: {} | waiver level: {} | primary provider: {}",
        config.transport_profile,
        config.waiver_level,
        if config.primary_available() { "ors" } else { "off" }
    );

    let addr: SocketAddr = config.server_url().parse()?;
    let app_state = match AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            error!("❌ Error inicializando el estado: {}", e);
            return Err(anyhow::anyhow!("Error de inicialización: {}", e));
        }
    };
    let app = create_app(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   POST /api/delivery-fee - Calcular frete");
    info!("   POST /api/calcular-entrega - Calcular frete (legacy)");
    info!("   GET  /health - Estado y estadísticas de cache");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
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
