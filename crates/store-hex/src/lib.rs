//! store-hex: hexagonal store API library (application services + inbound HTTP)

pub mod config;
pub mod errors;

pub mod application;

pub use store_types::{domain, ports, validation};

pub mod inbound; // HTTP adapter (server + handlers)
