pub mod conditional;
pub mod greeting_service;
pub mod negotiation;
pub mod patch_engine;

pub use conditional::*;
pub use greeting_service::*;
pub use negotiation::*;
pub use patch_engine::*;
