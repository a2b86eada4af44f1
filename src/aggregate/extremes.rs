use std::collections::BTreeMap;

use crate::aggregate::types::Extremes;
use crate::error::{PipelineError, Result};

/// Finds the minimum and maximum count and every key attaining each.
///
/// Ties are all reported (in ascending key order), not just the first key.
pub fn extremes<K: Ord + Clone>(counts: &BTreeMap<K, usize>) -> Result<Extremes<K>> {
    let (Some(&min), Some(&max)) = (counts.values().min(), counts.values().max()) else {
        return Err(PipelineError::EmptyInput {
            what: "the extremes",
        });
    };

    let keys_with = |target: usize| -> Vec<K> {
        counts
            .iter()
            .filter(|(_, count)| **count == target)
            .map(|(key, _)| key.clone())
            .collect()
    };

    Ok(Extremes {
        min,
        min_keys: keys_with(min),
        max,
        max_keys: keys_with(max),
    })
}
