use super::{
    HealthHandler, INDEX_PAGE, OperationHandler, PingHandler, RouteTable, SIMPLE_PAGE,
    StaticAssetHandler, dispatch,
};
use crate::GatewayConfig;
use crate::application::use_cases::ChangeOperationUseCase;
use axum::{Router, http::Method};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// ルートテーブルを構築し、ディスパッチャを唯一のハンドラとする Router を返す
pub fn build_router(config: &GatewayConfig, operations: Arc<ChangeOperationUseCase>) -> Router {
    let root = &config.static_root;
    let chunk_size = config.chunk_size;
    let index = Arc::new(StaticAssetHandler::page(root, INDEX_PAGE, chunk_size));

    let routes = RouteTable::builder()
        .route("/operation", Arc::new(OperationHandler::new(operations)))
        .route("/healthz", Arc::new(HealthHandler))
        .route_method(Method::GET, "/ping", Arc::new(PingHandler))
        .route("/", index.clone())
        .route("/index.html", index)
        .route(
            "/simple.html",
            Arc::new(StaticAssetHandler::page(root, SIMPLE_PAGE, chunk_size)),
        )
        .route(
            "/assets/*",
            Arc::new(StaticAssetHandler::directory(root, chunk_size)),
        )
        .build();

    Router::new()
        .fallback(dispatch)
        .with_state(Arc::new(routes))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

pub async fn create_server<F>(
    config: &GatewayConfig,
    operations: Arc<ChangeOperationUseCase>,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!("Starting serial operation gateway...");

    // Parse socket address
    let addr: SocketAddr = config.bind_address().parse()?;
    let app = build_router(config, operations);

    let listener = TcpListener::bind(&addr).await?;
    info!(
        address = %listener.local_addr()?,
        static_root = %config.static_root.display(),
        "Web server started"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Web server stopped");
    Ok(())
}

/// Ctrl+C または SIGTERM を待つ
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
