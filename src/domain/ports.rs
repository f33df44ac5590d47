use crate::utils::error::Result;
use async_trait::async_trait;

/// Synchronous string key-value storage, modelled on browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Where the catalog document comes from. Fetched once per session.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<u8>>;
    fn location(&self) -> String;
}

pub trait ConfigProvider {
    fn catalog_source(&self) -> &str;
    fn data_dir(&self) -> &str;
    fn namespace(&self) -> &str;
}
