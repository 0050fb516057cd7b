// Adapters layer: concrete implementations for external systems (http transport, output files).

pub mod http;
pub mod sink;
