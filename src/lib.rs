// Public modules
pub mod auth;
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod error;
pub mod image;
pub mod interpret;
pub mod observability;
pub mod render;
pub mod types;
pub mod utils;

// Re-exports
pub use auth::{ClientCredentials, StaticToken, TokenProvider};
pub use client::{ChatSender, HttpSender, RawResponse};
pub use client_logger::ExchangeLogger;
pub use error::{Error, Result};
pub use image::{FsImageLoader, ImageData, ImageLoader, ImageMediaType};
pub use interpret::interpret;
pub use observability::register_biometrics;
pub use types::*;
