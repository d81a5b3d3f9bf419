pub mod api;
pub mod config;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

// Export logic types
pub use logic::{
    entity_tag, EntityTag, GreetingService, GreetingVersion, GreetingsVersion, PatchError,
};

// Export all model types
pub use model::*;

// Export seed module
pub use seed::*;

// Export store types
pub use store::{GreetingStore, MemoryStore};

use std::sync::Arc;
use tokio::net::TcpListener;

/// Build the application router over a fresh in-memory store.
pub async fn build_app(config: &config::AppConfig) -> axum::Router {
    let store = MemoryStore::new();
    if config.service.load_seed_data {
        seed::load_seed_data(&store).await;
    }

    let service = Arc::new(GreetingService::new(store, config.service.clone()));
    api::routes::create_router().with_state(service)
}

/// Serve the application on an already bound listener until the server stops.
pub async fn run_server(listener: TcpListener, config: &config::AppConfig) -> anyhow::Result<()> {
    let app = build_app(config).await;
    log::info!("greeting service listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[tokio::test]
    async fn test_build_app_respects_seed_flag() {
        use axum::body::Body;
        use axum::http::{header, Request, StatusCode};
        use tower::ServiceExt;

        let request = || {
            Request::builder()
                .uri("/greetings/hallo")
                .header(header::ACCEPT, "application/json")
                .body(Body::empty())
                .unwrap()
        };

        let seeded = build_app(&AppConfig::default()).await;
        assert_eq!(seeded.oneshot(request()).await.unwrap().status(), StatusCode::OK);

        let mut config = AppConfig::default();
        config.service.load_seed_data = false;
        let empty = build_app(&config).await;
        assert_eq!(
            empty.oneshot(request()).await.unwrap().status(),
            StatusCode::NOT_FOUND
        );
    }
}
