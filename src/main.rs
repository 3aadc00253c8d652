//! Swatchwise binary entrypoint wiring the REST API, the palette store and the preference model.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use swatchwise::{
    config::AppConfig,
    dao::palette_store::memory::MemoryPaletteStore,
    routes,
    services::storage_supervisor,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("creating upload directory {}", config.upload_dir.display()))?;

    let app_state = AppState::new(config);
    start_store(&app_state).await?;

    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Install the backend selected by `STORE` and fit the model on its stored feedback.
async fn start_store(state: &SharedState) -> anyhow::Result<()> {
    let backend = env::var("STORE").unwrap_or_else(|_| "memory".into());
    match backend.as_str() {
        "memory" => {
            info!("using in-memory palette store");
            storage_supervisor::install_and_retrain(state, Arc::new(MemoryPaletteStore::new()))
                .await;
        }
        #[cfg(feature = "mongo-store")]
        "mongo" => spawn_mongo_supervisor(state.clone()),
        other => anyhow::bail!("unsupported STORE backend `{other}`"),
    }
    Ok(())
}

/// Connect to MongoDB in the background; the API stays in degraded mode until it succeeds.
#[cfg(feature = "mongo-store")]
fn spawn_mongo_supervisor(state: SharedState) {
    use swatchwise::dao::{
        palette_store::{
            PaletteStore,
            mongodb::{DEFAULT_DATABASE, MongoConfig, MongoPaletteStore},
        },
        storage::StorageError,
    };

    let uri = env::var("MONGO_URI").unwrap_or_else(|_| {
        warn!("MONGO_URI not set; defaulting to localhost");
        "mongodb://localhost:27017".into()
    });
    let db_name = env::var("MONGO_DB").ok();
    info!(
        db = db_name.as_deref().unwrap_or(DEFAULT_DATABASE),
        "using MongoDB palette store"
    );

    tokio::spawn(storage_supervisor::run(state, move || {
        let uri = uri.clone();
        let db_name = db_name.clone();
        async move {
            let config = MongoConfig::from_uri(&uri, db_name.as_deref()).await?;
            let store = MongoPaletteStore::connect(config).await?;
            Ok::<_, StorageError>(Arc::new(store) as Arc<dyn PaletteStore>)
        }
    }));
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "cannot install SIGTERM handler; waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
