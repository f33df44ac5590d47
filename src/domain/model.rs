use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Technology {
    JavaScript,
    React,
}

impl Technology {
    pub fn as_str(&self) -> &'static str {
        match self {
            Technology::JavaScript => "javascript",
            Technology::React => "react",
        }
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Technology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "javascript" | "js" => Ok(Technology::JavaScript),
            "react" => Ok(Technology::React),
            other => Err(format!("unknown technology '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

/// Identity of a module: identifiers are only unique within one technology.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleKey {
    pub technology: Technology,
    pub identifier: String,
}

impl ModuleKey {
    pub fn new(technology: Technology, identifier: impl Into<String>) -> Self {
        Self {
            technology,
            identifier: identifier.into(),
        }
    }
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.technology, self.identifier)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub technology: Technology,
    pub identifier: String,
    pub title: String,
    pub summary: String,
    pub resource_locator: String,
    pub hours: u32,
    pub difficulty: Difficulty,
    pub prerequisites: Vec<String>,
}

impl Module {
    pub fn key(&self) -> ModuleKey {
        ModuleKey::new(self.technology, self.identifier.clone())
    }

    pub fn has_key(&self, key: &ModuleKey) -> bool {
        self.technology == key.technology && self.identifier == key.identifier
    }
}

/// Snapshot of a module taken when it was selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    pub technology: Technology,
    pub identifier: String,
    pub title: String,
    pub summary: String,
    pub resource_locator: String,
    pub hours: u32,
}

impl CartEntry {
    pub fn key(&self) -> ModuleKey {
        ModuleKey::new(self.technology, self.identifier.clone())
    }

    pub fn has_key(&self, key: &ModuleKey) -> bool {
        self.technology == key.technology && self.identifier == key.identifier
    }
}

impl From<&Module> for CartEntry {
    fn from(module: &Module) -> Self {
        Self {
            technology: module.technology,
            identifier: module.identifier.clone(),
            title: module.title.clone(),
            summary: module.summary.clone(),
            resource_locator: module.resource_locator.clone(),
            hours: module.hours,
        }
    }
}

/// Ordered selection, unique by [`ModuleKey`]. Serializes as a plain JSON array;
/// deserializing drops duplicate keys the same way [`CartState::from_entries`] does.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartEntry>", into = "Vec<CartEntry>")]
pub struct CartState {
    entries: Vec<CartEntry>,
}

impl From<Vec<CartEntry>> for CartState {
    fn from(entries: Vec<CartEntry>) -> Self {
        Self::from_entries(entries).0
    }
}

impl From<CartState> for Vec<CartEntry> {
    fn from(state: CartState) -> Self {
        state.entries
    }
}

impl CartState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a state from raw entries, keeping the first occurrence of each key.
    /// Returns the state and the number of duplicates dropped.
    pub fn from_entries(entries: Vec<CartEntry>) -> (Self, usize) {
        let mut state = CartState::new();
        let mut dropped = 0;
        for entry in entries {
            if state.contains(&entry.key()) {
                dropped += 1;
            } else {
                state.entries.push(entry);
            }
        }
        (state, dropped)
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CartEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &ModuleKey) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &ModuleKey) -> Option<&CartEntry> {
        self.entries.iter().find(|e| e.has_key(key))
    }

    pub(crate) fn position(&self, key: &ModuleKey) -> Option<usize> {
        self.entries.iter().position(|e| e.has_key(key))
    }

    pub(crate) fn insert(&mut self, index: usize, entry: CartEntry) {
        let index = index.min(self.entries.len());
        self.entries.insert(index, entry);
    }

    pub(crate) fn push(&mut self, entry: CartEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> CartEntry {
        self.entries.remove(index)
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'a> IntoIterator for &'a CartState {
    type Item = &'a CartEntry;
    type IntoIter = std::slice::Iter<'a, CartEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DifficultyFilter {
    #[default]
    All,
    Only(Difficulty),
}

impl DifficultyFilter {
    pub fn accepts(&self, difficulty: Difficulty) -> bool {
        match self {
            DifficultyFilter::All => true,
            DifficultyFilter::Only(wanted) => *wanted == difficulty,
        }
    }
}

impl FromStr for DifficultyFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(DifficultyFilter::All)
        } else {
            s.parse().map(DifficultyFilter::Only)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub search_text: String,
    pub difficulty: DifficultyFilter,
}

impl FilterCriteria {
    pub fn new(search_text: impl Into<String>, difficulty: DifficultyFilter) -> Self {
        Self {
            search_text: search_text.into(),
            difficulty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AggregateStats {
    pub item_count: usize,
    pub total_hours: u64,
}

/// A named group of module identifiers within one technology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleGroup {
    pub identifier: String,
    pub name: String,
    pub description: String,
    pub technology: Technology,
    pub modules: Vec<String>,
}

impl ModuleGroup {
    pub fn keys(&self) -> impl Iterator<Item = ModuleKey> + '_ {
        self.modules
            .iter()
            .map(move |id| ModuleKey::new(self.technology, id.clone()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TechnologyMetadata {
    pub total_modules: usize,
    pub estimated_hours: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}
