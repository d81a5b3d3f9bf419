pub mod common;
pub mod greeting;
pub mod patch;
pub mod request;
pub mod response;
pub mod tag;

pub use common::*;
pub use greeting::*;
pub use patch::*;
pub use request::*;
pub use response::*;
pub use tag::*;
