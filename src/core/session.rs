//! The session owns everything a catalog page needs: catalog load state, the
//! current technology and filter, the cart and the theme preference.
//!
//! Recoverable failures never escape a session method. They are logged and
//! queued as [`Notice`]s, which the front end drains once with
//! [`Session::take_notices`].

use crate::core::cart::{CartStore, SubscriptionId};
use crate::core::catalog::Catalog;
use crate::core::filter::filter_modules;
use crate::core::stats::compute_totals;
use crate::domain::model::{
    AggregateStats, CartState, DifficultyFilter, FilterCriteria, Module, ModuleKey, Technology,
    Theme,
};
use crate::domain::ports::KeyValueStore;
use crate::utils::error::{CatalogError, Result};
use std::fmt;

pub const DEFAULT_NAMESPACE: &str = "learning-catalog";

pub fn cart_key(namespace: &str) -> String {
    format!("{}.cart", namespace)
}

pub fn theme_key(namespace: &str) -> String {
    format!("{}.theme", namespace)
}

#[derive(Debug)]
pub enum CatalogState {
    Loading,
    Ready(Catalog),
    Unavailable { reason: String },
}

/// What the module list shows. An empty `Ready` list means nothing matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleListing {
    Loading,
    Unavailable,
    Ready(Vec<Module>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Added,
    Removed,
    Unchanged,
    UnknownModule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    LearningPath,
    ProjectExample,
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKind::LearningPath => f.write_str("learning path"),
            GroupKind::ProjectExample => f.write_str("project example"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAddReport {
    pub group: String,
    pub added: usize,
    pub already_selected: usize,
    pub unknown: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    CatalogUnavailable { reason: String },
    PersistenceWarning { reason: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::CatalogUnavailable { reason } => write!(
                f,
                "The module catalog could not be loaded ({}). Your saved selection is still available.",
                reason
            ),
            Notice::PersistenceWarning { reason } => write!(
                f,
                "Your selection could not be saved ({}). Changes are kept until you exit.",
                reason
            ),
        }
    }
}

fn persistence_notice(error: CatalogError) -> Notice {
    let reason = match error {
        CatalogError::PersistenceError { reason, .. } => reason,
        other => other.to_string(),
    };
    Notice::PersistenceWarning { reason }
}

pub struct Session<S: KeyValueStore> {
    catalog: CatalogState,
    technology: Technology,
    criteria: FilterCriteria,
    cart: CartStore<S>,
    theme_key: String,
    theme: Theme,
    notices: Vec<Notice>,
}

impl<S: KeyValueStore> Session<S> {
    /// Restores cart and theme from `storage`; the catalog starts out loading.
    pub fn restore(storage: S, namespace: &str) -> Self {
        let cart = CartStore::restore(storage, cart_key(namespace));
        let theme_key = theme_key(namespace);
        let theme = match cart.storage().get(&theme_key) {
            Ok(Some(raw)) => raw.parse::<Theme>().unwrap_or_else(|e| {
                tracing::warn!("Ignoring saved theme: {}", e);
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                tracing::warn!("Could not read saved theme: {}", e);
                Theme::default()
            }
        };

        Self {
            catalog: CatalogState::Loading,
            technology: Technology::JavaScript,
            criteria: FilterCriteria::default(),
            cart,
            theme_key,
            theme,
            notices: Vec::new(),
        }
    }

    /// Completes the one-shot catalog load. Only the first call has an effect.
    pub fn finish_loading(&mut self, result: Result<Catalog>) {
        if !matches!(self.catalog, CatalogState::Loading) {
            tracing::warn!("Catalog already loaded, ignoring second load result");
            return;
        }

        match result {
            Ok(catalog) => {
                self.catalog = CatalogState::Ready(catalog);
            }
            Err(e) => {
                tracing::error!("❌ {}", e);
                tracing::error!("💡 {}", e.recovery_suggestion());
                let reason = match e {
                    CatalogError::CatalogUnavailable { reason, .. } => reason,
                    other => other.to_string(),
                };
                self.notices.push(Notice::CatalogUnavailable {
                    reason: reason.clone(),
                });
                self.catalog = CatalogState::Unavailable { reason };
            }
        }
    }

    pub fn catalog_state(&self) -> &CatalogState {
        &self.catalog
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        match &self.catalog {
            CatalogState::Ready(catalog) => Some(catalog),
            _ => None,
        }
    }

    pub fn technology(&self) -> Technology {
        self.technology
    }

    /// Switching technology resets the filter.
    pub fn select_technology(&mut self, technology: Technology) {
        if technology != self.technology {
            self.technology = technology;
            self.criteria = FilterCriteria::default();
        }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.criteria.search_text = text.into();
    }

    pub fn set_difficulty(&mut self, difficulty: DifficultyFilter) {
        self.criteria.difficulty = difficulty;
    }

    pub fn visible_modules(&self) -> ModuleListing {
        match &self.catalog {
            CatalogState::Loading => ModuleListing::Loading,
            CatalogState::Unavailable { .. } => ModuleListing::Unavailable,
            CatalogState::Ready(catalog) => ModuleListing::Ready(
                filter_modules(catalog.modules(self.technology), &self.criteria)
                    .into_iter()
                    .cloned()
                    .collect(),
            ),
        }
    }

    /// `None` until the catalog is ready.
    pub fn find_module(&self, key: &ModuleKey) -> Option<&Module> {
        self.catalog()
            .and_then(|c| c.find_module(key.technology, &key.identifier))
    }

    fn resolve(&self, key: &ModuleKey) -> Option<Module> {
        let catalog = self.catalog()?;
        match catalog.require_module(key) {
            Ok(module) => Some(module.clone()),
            Err(e) => {
                tracing::warn!("Ignoring selection: {}", e);
                None
            }
        }
    }

    pub fn is_selected(&self, key: &ModuleKey) -> bool {
        self.cart.contains(key)
    }

    pub fn add(&mut self, key: &ModuleKey) -> Selection {
        let Some(module) = self.resolve(key) else {
            return Selection::UnknownModule;
        };
        match self.cart.add(&module) {
            Ok(true) => Selection::Added,
            Ok(false) => Selection::Unchanged,
            Err(e) => {
                self.notices.push(persistence_notice(e));
                Selection::Added
            }
        }
    }

    /// Works without a catalog, so a saved selection can be pruned offline.
    pub fn remove(&mut self, key: &ModuleKey) -> Selection {
        let present = self.cart.contains(key);
        match self.cart.remove(key) {
            Ok(true) => Selection::Removed,
            Ok(false) => Selection::Unchanged,
            Err(e) => {
                self.notices.push(persistence_notice(e));
                if present {
                    Selection::Removed
                } else {
                    Selection::Unchanged
                }
            }
        }
    }

    pub fn toggle(&mut self, key: &ModuleKey) -> Selection {
        if self.cart.contains(key) {
            return self.remove(key);
        }
        let Some(module) = self.resolve(key) else {
            return Selection::UnknownModule;
        };
        if let Err(e) = self.cart.toggle(&module) {
            self.notices.push(persistence_notice(e));
        }
        Selection::Added
    }

    pub fn add_learning_path(&mut self, identifier: &str) -> Option<GroupAddReport> {
        self.add_group(GroupKind::LearningPath, identifier)
    }

    pub fn add_project_example(&mut self, identifier: &str) -> Option<GroupAddReport> {
        self.add_group(GroupKind::ProjectExample, identifier)
    }

    /// Adds every not-yet-selected module of a group. Members missing from
    /// the catalog are skipped and listed in the report.
    pub fn add_group(&mut self, kind: GroupKind, identifier: &str) -> Option<GroupAddReport> {
        let CatalogState::Ready(catalog) = &self.catalog else {
            tracing::warn!("Cannot add {} '{}' before the catalog is loaded", kind, identifier);
            return None;
        };
        let group = match kind {
            GroupKind::LearningPath => catalog.find_learning_path(identifier),
            GroupKind::ProjectExample => catalog.find_project_example(identifier),
        };
        let Some(group) = group else {
            tracing::warn!("Unknown {} '{}'", kind, identifier);
            return None;
        };

        let mut modules = Vec::new();
        let mut already_selected = 0;
        let mut unknown = Vec::new();
        for key in group.keys() {
            match catalog.find_module(key.technology, &key.identifier) {
                Some(_) if self.cart.contains(&key) => already_selected += 1,
                Some(module) => modules.push(module),
                None => unknown.push(key.identifier),
            }
        }
        if !unknown.is_empty() {
            tracing::warn!(
                "{} '{}' references modules missing from the catalog: {}",
                kind,
                group.identifier,
                unknown.join(", ")
            );
        }

        let before = self.cart.len();
        if let Err(e) = self.cart.add_all(modules) {
            self.notices.push(persistence_notice(e));
        }
        let added = self.cart.len() - before;
        tracing::info!("Added {} modules from {} '{}'", added, kind, group.identifier);

        Some(GroupAddReport {
            group: group.identifier.clone(),
            added,
            already_selected,
            unknown,
        })
    }

    pub fn clear_cart(&mut self) {
        if let Err(e) = self.cart.clear() {
            self.notices.push(persistence_notice(e));
        }
    }

    pub fn cart(&self) -> CartState {
        self.cart.snapshot()
    }

    pub fn totals(&self) -> AggregateStats {
        compute_totals(&self.cart.snapshot())
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&CartState) + 'static,
    {
        self.cart.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.cart.unsubscribe(id)
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        if let Err(e) = self.cart.storage().set(&self.theme_key, theme.as_str()) {
            tracing::warn!("Could not save theme: {}", e);
            self.notices.push(persistence_notice(e));
        }
    }

    pub fn toggle_theme(&mut self) -> Theme {
        let next = self.theme.toggled();
        self.set_theme(next);
        next
    }

    /// Drains queued notices; each is returned exactly once.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStore;
    use crate::core::catalog::tests::SAMPLE_CATALOG;
    use crate::domain::model::Difficulty;

    const NS: &str = "test";

    fn ready_session(storage: MemoryStore) -> Session<MemoryStore> {
        let mut session = Session::restore(storage, NS);
        session.finish_loading(Catalog::from_json_str(SAMPLE_CATALOG));
        session
    }

    fn js(id: &str) -> ModuleKey {
        ModuleKey::new(Technology::JavaScript, id)
    }

    fn react(id: &str) -> ModuleKey {
        ModuleKey::new(Technology::React, id)
    }

    fn listing_ids(listing: ModuleListing) -> Vec<String> {
        match listing {
            ModuleListing::Ready(modules) => modules.into_iter().map(|m| m.identifier).collect(),
            other => panic!("expected a ready listing, got {:?}", other),
        }
    }

    #[test]
    fn test_listing_states() {
        let mut session = Session::restore(MemoryStore::new(), NS);
        assert_eq!(session.visible_modules(), ModuleListing::Loading);
        assert!(session.find_module(&js("Arrays")).is_none());

        session.finish_loading(Catalog::from_json_str(SAMPLE_CATALOG));
        assert_eq!(listing_ids(session.visible_modules()), vec!["Arrays", "OOP"]);

        session.set_search("zzz");
        assert_eq!(session.visible_modules(), ModuleListing::Ready(vec![]));
    }

    #[test]
    fn test_switching_technology_resets_criteria() {
        let mut session = ready_session(MemoryStore::new());
        session.set_search("arr");
        session.set_difficulty(DifficultyFilter::Only(Difficulty::Beginner));
        assert_eq!(listing_ids(session.visible_modules()), vec!["Arrays"]);

        session.select_technology(Technology::JavaScript);
        assert_eq!(session.criteria().search_text, "arr");

        session.select_technology(Technology::React);
        assert_eq!(session.criteria(), &FilterCriteria::default());
        assert_eq!(listing_ids(session.visible_modules()), vec!["Hooks", "Events"]);
    }

    #[test]
    fn test_unknown_module_is_a_noop() {
        let mut session = ready_session(MemoryStore::new());
        assert_eq!(session.add(&js("Missing")), Selection::UnknownModule);
        assert_eq!(session.toggle(&react("Arrays")), Selection::UnknownModule);
        assert!(session.cart().is_empty());
        assert!(session.take_notices().is_empty());
    }

    #[test]
    fn test_failed_load_is_reported_once_and_cart_stays_usable() {
        let storage = MemoryStore::new();
        {
            let mut session = ready_session(storage.clone());
            session.add(&js("Arrays"));
            session.add(&js("OOP"));
        }

        let mut session = Session::restore(storage, NS);
        session.finish_loading(Err(CatalogError::CatalogUnavailable {
            location: "modules.json".to_string(),
            reason: "HTTP status 500".to_string(),
        }));
        // A late success must not replace the failure.
        session.finish_loading(Catalog::from_json_str(SAMPLE_CATALOG));

        assert_eq!(session.visible_modules(), ModuleListing::Unavailable);
        assert_eq!(session.totals().total_hours, 18);
        assert_eq!(session.add(&js("Arrays")), Selection::UnknownModule);
        assert_eq!(session.remove(&js("Arrays")), Selection::Removed);
        assert_eq!(session.toggle(&js("OOP")), Selection::Removed);
        assert!(session.cart().is_empty());

        let notices = session.take_notices();
        assert_eq!(notices.len(), 1);
        assert!(matches!(&notices[0], Notice::CatalogUnavailable { reason } if reason.contains("500")));
        assert!(session.take_notices().is_empty());
    }

    #[test]
    fn test_persistence_failure_becomes_notice() {
        let mut session = ready_session(MemoryStore::with_quota(16));

        assert_eq!(session.add(&js("Arrays")), Selection::Added);
        assert!(session.is_selected(&js("Arrays")));
        let notices = session.take_notices();
        assert_eq!(notices.len(), 1);
        assert!(matches!(&notices[0], Notice::PersistenceWarning { reason } if reason == "quota exceeded"));
    }

    #[test]
    fn test_remove_with_failing_storage_reports_actual_change() {
        let mut session = ready_session(MemoryStore::with_quota(1));
        session.add(&js("Arrays"));
        session.add(&js("OOP"));
        session.take_notices();
        let before = session.cart();

        assert_eq!(session.remove(&js("missing")), Selection::Unchanged);
        assert_eq!(session.cart(), before);

        assert_eq!(session.remove(&js("Arrays")), Selection::Removed);
        assert!(!session.is_selected(&js("Arrays")));

        session.clear_cart();
        assert!(session.cart().is_empty());

        let notices = session.take_notices();
        assert_eq!(notices.len(), 3);
        assert!(notices
            .iter()
            .all(|n| matches!(n, Notice::PersistenceWarning { reason } if reason == "quota exceeded")));
    }

    #[test]
    fn test_totals_of_huge_modules() {
        let mut session = Session::restore(MemoryStore::new(), NS);
        session.finish_loading(Catalog::from_json_str(
            r#"{"javascript": {"modules": [
                {"name": "Marathon", "title": "Marathon", "hours": 4294967294},
                {"name": "Ultra", "title": "Ultra", "hours": 4294967294}
            ]}}"#,
        ));

        session.add(&js("Marathon"));
        session.add(&js("Ultra"));
        assert_eq!(
            session.totals(),
            AggregateStats {
                item_count: 2,
                total_hours: 2 * u64::from(u32::MAX - 1)
            }
        );
    }

    #[test]
    fn test_add_project_example_reports_counts() {
        let mut session = ready_session(MemoryStore::new());
        session.add(&react("Hooks"));

        let report = session.add_project_example("todo-app").unwrap();
        assert_eq!(report.added, 1);
        assert_eq!(report.already_selected, 1);
        assert_eq!(report.unknown, vec!["Context".to_string()]);
        assert_eq!(session.totals().item_count, 2);

        let again = session.add_project_example("todo-app").unwrap();
        assert_eq!(again.added, 0);
        assert_eq!(again.already_selected, 2);
    }

    #[test]
    fn test_add_learning_path_and_unknown_group() {
        let mut session = ready_session(MemoryStore::new());
        let report = session.add_learning_path("js-basics").unwrap();
        assert_eq!(report.added, 2);
        assert_eq!(session.totals().total_hours, 18);

        assert!(session.add_learning_path("nope").is_none());
        assert!(session.add_project_example("js-basics").is_none());
    }

    #[test]
    fn test_groups_need_a_catalog() {
        let mut session = Session::restore(MemoryStore::new(), NS);
        assert!(session.add_learning_path("js-basics").is_none());
    }

    #[test]
    fn test_theme_is_persisted() {
        let storage = MemoryStore::new();
        {
            let mut session = Session::restore(storage.clone(), NS);
            assert_eq!(session.theme(), Theme::Light);
            assert_eq!(session.toggle_theme(), Theme::Dark);
        }
        assert_eq!(storage.get(&theme_key(NS)).unwrap().as_deref(), Some("dark"));
        assert_eq!(Session::restore(storage.clone(), NS).theme(), Theme::Dark);

        storage.set(&theme_key(NS), "sepia").unwrap();
        assert_eq!(Session::restore(storage, NS).theme(), Theme::Light);
    }

    #[test]
    fn test_subscribers_follow_session_changes() {
        use std::cell::Cell;
        use std::rc::Rc;

        let mut session = ready_session(MemoryStore::new());
        let hours = Rc::new(Cell::new(0));
        let sink = Rc::clone(&hours);
        session.subscribe(move |state| sink.set(compute_totals(state).total_hours));

        session.add(&js("OOP"));
        assert_eq!(hours.get(), 12);
        session.clear_cart();
        assert_eq!(hours.get(), 0);
    }
}
