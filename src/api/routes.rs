use axum::{
    routing::{delete, get, options, patch, post, put},
    Router,
};

use crate::api::handlers::{self, AppState};
use crate::store::GreetingStore;

pub fn create_router<S: GreetingStore + 'static>() -> Router<AppState<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Greetings collection
        .route("/greetings", get(handlers::list_greetings::<S>))
        .route("/greetings", post(handlers::create_greeting::<S>))
        .route("/greetings", options(handlers::collection_options))
        // Single greeting
        .route("/greetings/:greeting", get(handlers::get_greeting::<S>))
        .route("/greetings/:greeting", put(handlers::replace_greeting::<S>))
        .route("/greetings/:greeting", patch(handlers::patch_greeting::<S>))
        .route("/greetings/:greeting", delete(handlers::delete_greeting::<S>))
        .route("/greetings/:greeting", options(handlers::greeting_options))
}
