//! The cart: an ordered, deduplicated selection of modules, written through
//! to a [`KeyValueStore`] after every mutation.

use crate::domain::model::{CartEntry, CartState, Module, ModuleKey};
use crate::domain::ports::KeyValueStore;
use crate::utils::error::{CatalogError, Result};

pub type SubscriptionId = usize;

type Listener = Box<dyn FnMut(&CartState)>;

pub struct CartStore<S: KeyValueStore> {
    storage: S,
    key: String,
    state: CartState,
    // Position of the entry removed by the latest mutation, so that an
    // immediate re-add puts it back where it was.
    restore_slot: Option<(usize, ModuleKey)>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Empty cart; nothing is read from storage.
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            state: CartState::new(),
            restore_slot: None,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Cart restored from `key`. A missing, unreadable or corrupt value gives
    /// an empty cart.
    pub fn restore(storage: S, key: impl Into<String>) -> Self {
        let mut store = Self::new(storage, key);
        store.state = store.read_persisted();
        tracing::debug!("Restored {} cart entries from '{}'", store.state.len(), store.key);
        store
    }

    fn read_persisted(&self) -> CartState {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return CartState::new(),
            Err(e) => {
                tracing::warn!("Could not read saved cart '{}': {}", self.key, e);
                return CartState::new();
            }
        };

        match serde_json::from_str::<Vec<CartEntry>>(&raw) {
            Ok(entries) => {
                let (state, dropped) = CartState::from_entries(entries);
                if dropped > 0 {
                    tracing::warn!("Dropped {} duplicate entries from saved cart", dropped);
                }
                state
            }
            Err(e) => {
                tracing::warn!("Saved cart '{}' is corrupt, starting empty: {}", self.key, e);
                CartState::new()
            }
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn contains(&self, key: &ModuleKey) -> bool {
        self.state.contains(key)
    }

    pub fn snapshot(&self) -> CartState {
        self.state.clone()
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Selects `module`. Returns `Ok(false)` without writing when it is
    /// already selected.
    pub fn add(&mut self, module: &Module) -> Result<bool> {
        let key = module.key();
        if self.state.contains(&key) {
            return Ok(false);
        }

        let entry = CartEntry::from(module);
        match self.restore_slot.take() {
            Some((index, slot_key)) if slot_key == key => self.state.insert(index, entry),
            _ => self.state.push(entry),
        }
        tracing::debug!("Added {} to cart", key);
        self.commit()?;
        Ok(true)
    }

    /// Deselects `key`. Storage is written even when nothing was removed.
    pub fn remove(&mut self, key: &ModuleKey) -> Result<bool> {
        let removed = match self.state.position(key) {
            Some(index) => {
                self.state.remove_at(index);
                self.restore_slot = Some((index, key.clone()));
                tracing::debug!("Removed {} from cart", key);
                true
            }
            None => {
                self.restore_slot = None;
                false
            }
        };
        self.commit()?;
        Ok(removed)
    }

    /// Returns whether the module is selected afterwards.
    pub fn toggle(&mut self, module: &Module) -> Result<bool> {
        let key = module.key();
        if self.state.contains(&key) {
            self.remove(&key)?;
            Ok(false)
        } else {
            self.add(module)?;
            Ok(true)
        }
    }

    /// Selects every module not already in the cart, writing once.
    /// Returns how many were newly added.
    pub fn add_all<'a, I>(&mut self, modules: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a Module>,
    {
        let mut added = 0;
        for module in modules {
            if !self.state.contains(&module.key()) {
                self.state.push(CartEntry::from(module));
                added += 1;
            }
        }
        if added > 0 {
            self.restore_slot = None;
            self.commit()?;
        }
        Ok(added)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.state.clear();
        self.restore_slot = None;
        self.commit()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&CartState) + 'static,
    {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Writes the whole cart, then notifies listeners. The in-memory state is
    /// kept even if the write fails.
    fn commit(&mut self) -> Result<()> {
        let persisted = self.persist();
        if let Err(e) = &persisted {
            tracing::warn!("Cart change kept in memory only: {}", e);
        }
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.state);
        }
        persisted
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.state)?;
        self.storage.set(&self.key, &json).map_err(|e| match e {
            CatalogError::PersistenceError { .. } => e,
            other => CatalogError::PersistenceError {
                key: self.key.clone(),
                reason: other.to_string(),
            },
        })
    }
}
