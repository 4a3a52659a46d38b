pub mod http;
pub mod model;
pub mod service;

pub use http::*;
pub use model::{Profile, UsernameResponse};
pub use service::*;
