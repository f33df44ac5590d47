pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{catalog_source_for, FileCatalogSource, FileStore, HttpCatalogSource, MemoryStore};
pub use crate::core::{
    cart::CartStore,
    catalog::{Catalog, CatalogLoader},
    filter::filter_modules,
    session::{ModuleListing, Notice, Selection, Session},
    stats::compute_totals,
};
pub use utils::error::{CatalogError, Result};
