//! Postal-code boundary polygons and the summary join.
//!
//! Boundaries are a GeoJSON `FeatureCollection` whose features carry the
//! postal code as a property. The join is a left join on the normalized
//! [`Plz`]: every polygon comes out exactly once, in input order.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use geojson::{FeatureCollection, GeoJson};
use serde_json::Value;
use tracing::{info, warn};

use crate::aggregate::PostalSummary;
use crate::error::{PipelineError, Result};
use crate::plz::Plz;

/// Property names used when joining.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinColumns<'a> {
    /// Postal-code property on the input features.
    pub boundary_key: &'a str,
    /// Property that carries the normalized postal code on output features.
    pub postal_code: &'a str,
    /// Property that carries the school count on output features.
    pub count: &'a str,
}

/// Result of [`join_summary`].
#[derive(Debug, Clone)]
pub struct JoinedBoundaries {
    pub collection: FeatureCollection,
    matched: usize,
}

impl JoinedBoundaries {
    pub fn len(&self) -> usize {
        self.collection.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.features.is_empty()
    }

    /// Polygons whose postal code had at least one school.
    pub fn matched(&self) -> usize {
        self.matched
    }

    pub fn unmatched(&self) -> usize {
        self.len() - self.matched
    }
}

/// Reads a GeoJSON file that must contain a `FeatureCollection`.
pub fn load_boundaries(path: &Path) -> Result<FeatureCollection> {
    let content = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
    let geojson = content
        .parse::<GeoJson>()
        .map_err(|e| PipelineError::GeoJson {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    match geojson {
        GeoJson::FeatureCollection(collection) => {
            info!(
                path = %path.display(),
                features = collection.features.len(),
                "Loaded boundary polygons"
            );
            Ok(collection)
        }
        _ => Err(PipelineError::NotAFeatureCollection {
            path: path.to_path_buf(),
        }),
    }
}

/// Left joins `summary` onto `boundaries` by postal code.
///
/// Each output feature keeps its geometry, id and properties, except that
/// `columns.boundary_key` is replaced by `columns.postal_code` holding the
/// normalized integer, and `columns.count` is added (`null` when no school
/// shares the postal code). A feature whose key is missing or not a valid
/// postal code fails the whole join with [`PipelineError::KeyType`].
pub fn join_summary(
    boundaries: &FeatureCollection,
    summary: &PostalSummary,
    columns: &JoinColumns<'_>,
) -> Result<JoinedBoundaries> {
    let mut features = Vec::with_capacity(boundaries.features.len());
    let mut matched = 0;
    let mut seen: HashSet<Plz> = HashSet::new();

    for (i, feature) in boundaries.features.iter().enumerate() {
        let location = format!("feature {i}");
        let raw = feature
            .property(columns.boundary_key)
            .ok_or_else(|| PipelineError::KeyType {
                value: String::new(),
                location: format!("{location} (no `{}` property)", columns.boundary_key),
            })?;
        let plz = Plz::from_json(raw, &location)?;
        seen.insert(plz);

        let mut joined = feature.clone();
        joined.remove_property(columns.boundary_key);
        joined.set_property(columns.postal_code, Value::from(plz.get()));

        let count = match summary.get(plz) {
            Some(count) => {
                matched += 1;
                Value::from(count)
            }
            None => Value::Null,
        };
        joined.set_property(columns.count, count);

        features.push(joined);
    }

    let joined = JoinedBoundaries {
        collection: FeatureCollection {
            bbox: boundaries.bbox.clone(),
            features,
            foreign_members: boundaries.foreign_members.clone(),
        },
        matched,
    };

    let orphaned = summary.iter().filter(|(plz, _)| !seen.contains(plz)).count();
    if orphaned > 0 {
        warn!(orphaned, "Postal codes with schools have no boundary polygon");
    }

    info!(
        polygons = joined.len(),
        matched = joined.matched(),
        unmatched = joined.unmatched(),
        "Joined summary onto boundaries"
    );
    Ok(joined)
}
