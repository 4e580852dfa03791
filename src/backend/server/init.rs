/**
 * Server Initialization
 *
 * Builds the application from configuration.
 *
 * # Initialization Process
 *
 * 1. Load the persistence backend (Postgres or in-memory)
 * 2. Create the app state (token service, registry, dispatcher)
 * 3. Create and configure the router
 */

use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::load_store;
use crate::backend::server::state::AppState;
use crate::backend::store::StoreError;
use crate::shared::AppConfig;

/// Create and configure the Axum application
///
/// # Errors
///
/// Fails if `DATABASE_URL` is set but the database cannot be reached or
/// migrated.
pub async fn create_app(config: AppConfig) -> Result<Router, StoreError> {
    tracing::info!("Initializing Kanban backend server");

    // Step 1: Load the store
    let store = load_store(&config).await?;

    // Step 2: Create app state
    let app_state = AppState::new(config, store);
    tracing::info!(
        ws_outgoing_buffer = app_state.config.ws_outgoing_buffer,
        "App state initialized"
    );

    // Step 3: Create router with all routes
    let app = create_router(app_state);
    tracing::info!("Router configured");

    Ok(app)
}
