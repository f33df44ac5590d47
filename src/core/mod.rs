pub mod cart;
pub mod catalog;
pub mod export;
pub mod filter;
pub mod session;
pub mod stats;

pub use crate::domain::model::{
    AggregateStats, CartEntry, CartState, Difficulty, DifficultyFilter, FilterCriteria, Module,
    ModuleGroup, ModuleKey, Technology, Theme,
};
pub use crate::domain::ports::{CatalogSource, ConfigProvider, KeyValueStore};
pub use crate::utils::error::Result;
