mod health;
mod users;

use axum::Router;

use crate::state::AppState;

/// Build the complete application router.
///
/// Structure:
/// - `GET /health`: lightweight liveness check
/// - `GET /api/v1/health`: health check with database connectivity
/// - `/api/v1/users/...`: account, cart and role operations
pub fn router() -> Router<AppState> {
    let api_v1 = Router::new()
        .merge(health::api_router())
        .merge(users::router());

    Router::new()
        .merge(health::root_router())
        .nest("/api/v1", api_v1)
}
