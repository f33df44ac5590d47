//! Catalog loading: the JSON document is parsed once and turned into
//! per-technology module lists with difficulty and hours resolved.

use crate::domain::model::{
    Difficulty, Module, ModuleGroup, ModuleKey, Technology, TechnologyMetadata,
};
use crate::domain::ports::CatalogSource;
use crate::utils::error::{CatalogError, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};

const DEFAULT_DIFFICULTY: Difficulty = Difficulty::Intermediate;

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    javascript: Option<TechnologySection>,
    #[serde(default)]
    react: Option<TechnologySection>,
    #[serde(default)]
    learning_paths: Vec<GroupDocument>,
    #[serde(default)]
    project_examples: Vec<GroupDocument>,
}

#[derive(Debug, Deserialize)]
struct TechnologySection {
    #[serde(default)]
    modules: Vec<ModuleDocument>,
    metadata: Option<MetadataDocument>,
    #[serde(default)]
    difficulty_levels: HashMap<String, Difficulty>,
    #[serde(default)]
    module_hours: HashMap<String, u32>,
}

#[derive(Debug, Deserialize)]
struct ModuleDocument {
    name: String,
    title: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    page_html: String,
    difficulty: Option<Difficulty>,
    hours: Option<u32>,
    #[serde(default)]
    prerequisites: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct MetadataDocument {
    total_modules: usize,
    estimated_hours: u64,
}

#[derive(Debug, Deserialize)]
struct GroupDocument {
    id: Option<String>,
    name: String,
    #[serde(default)]
    description: String,
    technology: Technology,
    #[serde(alias = "required_modules")]
    modules: Vec<String>,
}

#[derive(Debug, Clone, Default)]
struct TechnologyCatalog {
    modules: Vec<Module>,
    metadata: TechnologyMetadata,
}

/// Read-only module catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    technologies: BTreeMap<Technology, TechnologyCatalog>,
    learning_paths: Vec<ModuleGroup>,
    project_examples: Vec<ModuleGroup>,
}

impl Catalog {
    pub fn from_json_str(content: &str) -> Result<Self> {
        Self::from_slice(content.as_bytes())
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let document: CatalogDocument = serde_json::from_slice(bytes)?;
        Ok(Self::from_document(document))
    }

    fn from_document(document: CatalogDocument) -> Self {
        let mut technologies = BTreeMap::new();
        let sections = [
            (Technology::JavaScript, document.javascript),
            (Technology::React, document.react),
        ];
        for (technology, section) in sections {
            if let Some(section) = section {
                technologies.insert(technology, build_technology(technology, section));
            }
        }

        Self {
            technologies,
            learning_paths: build_groups(document.learning_paths),
            project_examples: build_groups(document.project_examples),
        }
    }

    /// Modules of one technology in document order; empty when the
    /// technology is not in the catalog.
    pub fn modules(&self, technology: Technology) -> &[Module] {
        self.technologies
            .get(&technology)
            .map(|t| t.modules.as_slice())
            .unwrap_or(&[])
    }

    pub fn find_module(&self, technology: Technology, identifier: &str) -> Option<&Module> {
        self.modules(technology)
            .iter()
            .find(|m| m.identifier == identifier)
    }

    pub fn require_module(&self, key: &ModuleKey) -> Result<&Module> {
        self.find_module(key.technology, &key.identifier)
            .ok_or_else(|| CatalogError::UnknownModuleReference {
                technology: key.technology.to_string(),
                identifier: key.identifier.clone(),
            })
    }

    pub fn metadata(&self, technology: Technology) -> Option<TechnologyMetadata> {
        self.technologies.get(&technology).map(|t| t.metadata)
    }

    pub fn technologies(&self) -> impl Iterator<Item = Technology> + '_ {
        self.technologies.keys().copied()
    }

    pub fn module_count(&self) -> usize {
        self.technologies.values().map(|t| t.modules.len()).sum()
    }

    pub fn learning_paths(&self) -> &[ModuleGroup] {
        &self.learning_paths
    }

    pub fn project_examples(&self) -> &[ModuleGroup] {
        &self.project_examples
    }

    pub fn find_learning_path(&self, identifier: &str) -> Option<&ModuleGroup> {
        self.learning_paths
            .iter()
            .find(|g| g.identifier == identifier)
    }

    pub fn find_project_example(&self, identifier: &str) -> Option<&ModuleGroup> {
        self.project_examples
            .iter()
            .find(|g| g.identifier == identifier)
    }
}

fn build_technology(technology: Technology, section: TechnologySection) -> TechnologyCatalog {
    let declared = section.metadata;
    let fallback_hours = match &declared {
        Some(meta) if !section.modules.is_empty() => {
            let count = section.modules.len() as u64;
            let per_module = meta.estimated_hours.div_ceil(count).max(1);
            u32::try_from(per_module).unwrap_or(u32::MAX)
        }
        _ => 1,
    };

    let mut seen = HashSet::new();
    let mut modules = Vec::with_capacity(section.modules.len());
    for raw in section.modules {
        if !seen.insert(raw.name.clone()) {
            tracing::warn!(
                "Duplicate module '{}' in {} catalog, keeping the first one",
                raw.name,
                technology
            );
            continue;
        }

        let hours = raw
            .hours
            .or_else(|| section.module_hours.get(&raw.name).copied())
            .filter(|h| {
                if *h == 0 {
                    tracing::warn!("Module {}/{} declares 0 hours, ignoring", technology, raw.name);
                }
                *h > 0
            })
            .unwrap_or(fallback_hours);

        let difficulty = raw
            .difficulty
            .or_else(|| section.difficulty_levels.get(&raw.name).copied())
            .unwrap_or(DEFAULT_DIFFICULTY);

        modules.push(Module {
            technology,
            identifier: raw.name,
            title: raw.title,
            summary: raw.summary,
            resource_locator: raw.page_html,
            hours,
            difficulty,
            prerequisites: raw.prerequisites,
        });
    }

    let metadata = match declared {
        Some(meta) => {
            if meta.total_modules != modules.len() {
                tracing::warn!(
                    "{} catalog declares {} modules but contains {}",
                    technology,
                    meta.total_modules,
                    modules.len()
                );
            }
            TechnologyMetadata {
                total_modules: meta.total_modules,
                estimated_hours: meta.estimated_hours,
            }
        }
        None => TechnologyMetadata {
            total_modules: modules.len(),
            estimated_hours: modules.iter().map(|m| u64::from(m.hours)).sum(),
        },
    };

    TechnologyCatalog { modules, metadata }
}

fn build_groups(groups: Vec<GroupDocument>) -> Vec<ModuleGroup> {
    groups
        .into_iter()
        .map(|g| ModuleGroup {
            identifier: g.id.unwrap_or_else(|| g.name.clone()),
            name: g.name,
            description: g.description,
            technology: g.technology,
            modules: g.modules,
        })
        .collect()
}

/// One-shot catalog loading. Any fetch or parse failure becomes
/// [`CatalogError::CatalogUnavailable`].
pub struct CatalogLoader;

impl CatalogLoader {
    pub async fn load(source: &dyn CatalogSource) -> Result<Catalog> {
        let location = source.location();
        tracing::debug!("Loading catalog from: {}", location);

        let bytes = source
            .fetch()
            .await
            .map_err(|e| unavailable(&location, e))?;
        let catalog = Catalog::from_slice(&bytes).map_err(|e| unavailable(&location, e))?;

        tracing::info!(
            "Loaded {} modules, {} learning paths, {} project examples",
            catalog.module_count(),
            catalog.learning_paths().len(),
            catalog.project_examples().len()
        );
        Ok(catalog)
    }
}

fn unavailable(location: &str, error: CatalogError) -> CatalogError {
    let reason = match error {
        CatalogError::CatalogUnavailable { reason, .. } => reason,
        other => other.to_string(),
    };
    CatalogError::CatalogUnavailable {
        location: location.to_string(),
        reason,
    }
}
