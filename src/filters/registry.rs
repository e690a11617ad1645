use serde::{Deserialize, Serialize};

use crate::filters::expr::{FilterChain, parse_filter_expression};
use crate::foundation::error::{BoothError, BoothResult};

/// A named visual filter: display label plus the expression applied at preview and capture time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterSpec {
    /// Unique display label.
    pub name: String,
    /// Filter expression, e.g. `sepia(100%)`.
    pub expression: String,
}

impl FilterSpec {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
        }
    }
}

/// The built-in filter catalog, in display order.
pub fn default_specs() -> Vec<FilterSpec> {
    vec![
        FilterSpec::new("Normal", "none"),
        FilterSpec::new("Mono", "grayscale(100%)"),
        FilterSpec::new("Sepia", "sepia(100%)"),
        FilterSpec::new("Cool", "hue-rotate(180deg) saturate(120%)"),
        FilterSpec::new("Warm", "brightness(110%) saturate(120%)"),
        FilterSpec::new("Retro", "contrast(130%) brightness(90%)"),
        FilterSpec::new("Blur", "blur(2px)"),
    ]
}

/// Ordered, immutable catalog of filters with their expressions pre-parsed.
///
/// Preview and capture both read the expression from here, so the text a user sees applied
/// is exactly the text baked into the still.
#[derive(Clone, Debug)]
pub struct FilterRegistry {
    specs: Vec<FilterSpec>,
    chains: Vec<FilterChain>,
}

impl FilterRegistry {
    /// Build a registry; rejects an empty list, duplicate names and unparsable expressions.
    pub fn new(specs: Vec<FilterSpec>) -> BoothResult<Self> {
        let chains = parse_catalog(&specs)?;
        Ok(Self { specs, chains })
    }

    /// All filters in display order.
    pub fn list(&self) -> &[FilterSpec] {
        &self.specs
    }

    /// Filter at `index`.
    pub fn get(&self, index: usize) -> BoothResult<&FilterSpec> {
        self.specs
            .get(index)
            .ok_or_else(|| BoothError::index_out_of_range(index, self.specs.len()))
    }

    /// Parsed expression of the filter at `index`.
    pub fn chain(&self, index: usize) -> BoothResult<&FilterChain> {
        self.chains
            .get(index)
            .ok_or_else(|| BoothError::index_out_of_range(index, self.chains.len()))
    }

    /// Index of the filter named `name` (case-insensitive).
    pub fn position(&self, name: &str) -> Option<usize> {
        self.specs
            .iter()
            .position(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Number of filters.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Always `false` for a constructed registry.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::new(default_specs()).expect("built-in filter catalog parses")
    }
}

fn parse_catalog(specs: &[FilterSpec]) -> BoothResult<Vec<FilterChain>> {
    if specs.is_empty() {
        return Err(BoothError::validation("filter registry must not be empty"));
    }
    let mut chains = Vec::with_capacity(specs.len());
    for (i, spec) in specs.iter().enumerate() {
        if spec.name.trim().is_empty() {
            return Err(BoothError::validation(format!(
                "filter #{i} has an empty name"
            )));
        }
        if specs[..i].iter().any(|s| s.name == spec.name) {
            return Err(BoothError::validation(format!(
                "duplicate filter name '{}'",
                spec.name
            )));
        }
        let chain = parse_filter_expression(&spec.expression)
            .map_err(|e| BoothError::validation(format!("filter '{}': {e}", spec.name)))?;
        chains.push(chain);
    }
    Ok(chains)
}

#[cfg(test)]
#[path = "../../tests/unit/filters/registry.rs"]
mod tests;
