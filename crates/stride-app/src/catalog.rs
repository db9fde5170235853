// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Category, FitnessTest};

/// Label the UI shows for the "no category filter" chip.
pub const ALL_CATEGORIES: &str = "All";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    /// Maps the `All` sentinel to [`CategoryFilter::All`]; anything else is
    /// taken verbatim, including names that match no test.
    pub fn parse(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Named(value.to_owned())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Named(name) => name,
        }
    }

    pub fn admits(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => name == category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogQuery {
    pub search: String,
    pub category: CategoryFilter,
}

impl CatalogQuery {
    pub fn new(search: impl Into<String>, category: CategoryFilter) -> Self {
        Self {
            search: search.into(),
            category,
        }
    }

    pub fn apply(&self, tests: &[FitnessTest]) -> Vec<FitnessTest> {
        filter_tests(tests, &self.search, &self.category)
    }
}

fn text_matches(test: &FitnessTest, needle: &str) -> bool {
    needle.is_empty()
        || test.name.to_lowercase().contains(needle)
        || test.description.to_lowercase().contains(needle)
}

/// Visible subset of `tests` for a search string and category selection.
///
/// Stable: the relative order of `tests` is preserved. An unknown category
/// yields an empty list.
pub fn filter_tests(
    tests: &[FitnessTest],
    search: &str,
    category: &CategoryFilter,
) -> Vec<FitnessTest> {
    let needle = search.to_lowercase();
    tests
        .iter()
        .filter(|test| category.admits(&test.category) && text_matches(test, &needle))
        .cloned()
        .collect()
}

pub fn count_by_category(tests: &[FitnessTest]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for test in tests {
        *counts.entry(test.category.clone()).or_insert(0) += 1;
    }
    counts
}

/// Categories with their `count` replaced by the live catalog count.
pub fn with_live_counts(categories: &[Category], tests: &[FitnessTest]) -> Vec<Category> {
    let counts = count_by_category(tests);
    categories
        .iter()
        .map(|category| Category {
            count: counts.get(&category.name).copied().unwrap_or(0),
            ..category.clone()
        })
        .collect()
}

pub fn result_label(count: usize) -> String {
    if count == 1 {
        "1 result".to_owned()
    } else {
        format!("{count} results")
    }
}
