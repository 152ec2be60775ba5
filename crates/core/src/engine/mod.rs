//! Remote download engine abstraction.
//!
//! This module provides a `DownloadEngine` trait over the engine's REST
//! surface and the HTTP implementation used in production.

mod http;
mod types;

pub use http::{HttpEngineClient, API_KEY_HEADER};
pub use types::*;
