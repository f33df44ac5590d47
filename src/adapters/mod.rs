// Adapters layer: concrete implementations of the domain ports (catalog sources, storage).

pub mod http;
pub mod storage;

pub use http::{catalog_source_for, FileCatalogSource, HttpCatalogSource};
pub use storage::{FileStore, MemoryStore};
