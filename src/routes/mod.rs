use axum::Router;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};

mod health;
mod readings;

// ---

pub fn router(pool: PgPool) -> Router {
    // ---
    // Browser dashboards fetch from another origin, so CORS stays permissive.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(readings::router())
        .merge(health::router())
        .layer(cors)
        .with_state(pool)
}
