//! schemarest server: loads schemas from `SCHEMA_PATH`, opens the store at `DATABASE_URL`,
//! creates missing tables and serves the generated routes on `HOST:PORT`.

use schemarest::{
    app, apply_migrations, fault_channel, load_from_path, resolve, serve, AppState, Settings, Store,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("schemarest=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let configs = load_from_path(&settings.schema_path).await?;
    let model = resolve(&configs)?;

    let store = Store::connect(&settings.database_url).await?;
    apply_migrations(&store, &model).await?;

    let (faults, fault_rx) = fault_channel(settings.on_create_failure);
    let state = AppState {
        store,
        model: Arc::new(model),
        faults,
    };
    let router = app(state, settings.max_body_bytes);

    let listener = TcpListener::bind(settings.bind_addr()).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    serve(listener, router, fault_rx).await?;
    Ok(())
}
