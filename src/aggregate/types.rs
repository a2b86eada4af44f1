//! Data types produced by the aggregation step.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::plz::Plz;

/// School count per postal code, ordered by postal code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostalSummary {
    pub(crate) counts: BTreeMap<Plz, usize>,
}

impl PostalSummary {
    pub fn get(&self, plz: Plz) -> Option<usize> {
        self.counts.get(&plz).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of schools across all postal codes.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Plz, usize)> + '_ {
        self.counts.iter().map(|(plz, count)| (*plz, *count))
    }

    pub fn as_map(&self) -> &BTreeMap<Plz, usize> {
        &self.counts
    }

    pub fn rows(&self) -> Vec<SummaryRow> {
        self.iter()
            .map(|(plz, count)| SummaryRow { plz, count })
            .collect()
    }
}

impl FromIterator<(Plz, usize)> for PostalSummary {
    fn from_iter<I: IntoIterator<Item = (Plz, usize)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

/// School count per (postal code, school type), ordered by postal code then type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySummary {
    pub(crate) counts: BTreeMap<(Plz, String), usize>,
}

impl CategorySummary {
    pub fn get(&self, plz: Plz, category: &str) -> Option<usize> {
        self.counts.get(&(plz, category.to_string())).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn as_map(&self) -> &BTreeMap<(Plz, String), usize> {
        &self.counts
    }

    pub fn rows(&self) -> Vec<CategoryRow> {
        self.counts
            .iter()
            .map(|((plz, category), count)| CategoryRow {
                plz: *plz,
                category: category.clone(),
                count: *count,
            })
            .collect()
    }
}

/// One line of the postal-code summary artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub plz: Plz,
    pub count: usize,
}

/// One line of the per-type breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub plz: Plz,
    pub category: String,
    pub count: usize,
}

/// Smallest and largest count in a summary, with every key attaining each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extremes<K> {
    pub min: usize,
    pub min_keys: Vec<K>,
    pub max: usize,
    pub max_keys: Vec<K>,
}
