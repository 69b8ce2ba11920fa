// Adapters layer: concrete implementations for external systems (search API, storage).

pub mod http;
pub mod storage;
