use crate::domain::model::{FilterCriteria, Module};

/// Returns the modules matching `criteria`, in input order.
///
/// A module matches when the search text is empty or is a case-insensitive
/// substring of its title, identifier or summary, and its difficulty passes
/// the difficulty filter.
pub fn filter_modules<'a>(modules: &'a [Module], criteria: &FilterCriteria) -> Vec<&'a Module> {
    let needle = criteria.search_text.to_lowercase();
    modules
        .iter()
        .filter(|m| criteria.difficulty.accepts(m.difficulty))
        .filter(|m| matches_search(m, &needle))
        .collect()
}

fn matches_search(module: &Module, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    [&module.title, &module.identifier, &module.summary]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}
