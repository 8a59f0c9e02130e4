// Adapters layer: concrete implementations for external systems (http sources, uploads, web server).

pub mod fetch;
pub mod http;
pub mod upload;
