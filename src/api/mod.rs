pub mod handlers;
pub mod request_context;
pub mod routes;

pub use handlers::*;
pub use request_context::*;
pub use routes::*;
