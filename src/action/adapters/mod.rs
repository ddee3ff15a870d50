//! Adapter implementations for action execution ports.

pub mod memory;

mod http;

pub use http::ReqwestWebhookTransport;
