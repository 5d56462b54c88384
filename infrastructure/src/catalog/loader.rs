//! Catalog loader
//!
//! Reads the diagnostic grid from JSON: either the grid embedded in the
//! binary or a file given in configuration. Two layouts are accepted:
//!
//! - a list of criteria, in asking order;
//! - an object keyed by criterion id, ordered by the decoded id.

use assess_domain::{Catalog, Criterion, DomainError};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

const EMBEDDED_GRID: &str = include_str!("../../data/diagnostic_grid.json");

/// Errors raised while loading a catalog.
#[derive(Error, Debug)]
pub enum CatalogLoadError {
    #[error("Cannot read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid catalog: {0}")]
    Invalid(#[from] DomainError),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GridFile {
    List(Vec<Criterion>),
    Keyed(HashMap<String, serde_json::Value>),
}

pub struct CatalogLoader;

impl CatalogLoader {
    /// Load from `path` when given, else the embedded grid.
    pub fn load(path: Option<&Path>) -> Result<Catalog, CatalogLoadError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::embedded(),
        }
    }

    /// The standard 72-criterion grid.
    pub fn embedded() -> Result<Catalog, CatalogLoadError> {
        Self::from_json(EMBEDDED_GRID)
    }

    pub fn from_path(path: &Path) -> Result<Catalog, CatalogLoadError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        info!(path = %path.display(), criteria = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    pub fn from_json(json: &str) -> Result<Catalog, CatalogLoadError> {
        let criteria = match serde_json::from_str::<GridFile>(json)? {
            GridFile::List(criteria) => criteria,
            GridFile::Keyed(map) => keyed_to_list(map)?,
        };
        Ok(Catalog::new(criteria)?)
    }
}

/// Inject each key as `id` and order by decoded (dimension, tier, ordinal).
fn keyed_to_list(map: HashMap<String, serde_json::Value>) -> Result<Vec<Criterion>, CatalogLoadError> {
    let mut criteria = Vec::with_capacity(map.len());
    for (id, mut value) in map {
        if let serde_json::Value::Object(fields) = &mut value {
            fields.insert("id".to_string(), serde_json::Value::String(id));
        }
        criteria.push(serde_json::from_value::<Criterion>(value)?);
    }

    let mut keyed = Vec::with_capacity(criteria.len());
    for criterion in criteria {
        let code = criterion.id.code()?;
        keyed.push(((code.dimension, code.tier, code.ordinal), criterion));
    }
    keyed.sort_by_key(|(key, _)| *key);
    Ok(keyed.into_iter().map(|(_, c)| c).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assess_domain::{Dimension, Tier};

    #[test]
    fn test_embedded_grid_is_complete() {
        let catalog = CatalogLoader::embedded().unwrap();
        assert_eq!(catalog.len(), 72);
        for dimension in Dimension::ALL {
            assert_eq!(catalog.dimension_size(dimension), 12);
            assert_eq!(catalog.max_raw_score(dimension), 36);
        }
        let first = catalog.get(0).unwrap();
        assert_eq!(first.id.as_str(), "D1-P1-C1");
        assert_eq!(first.options.len(), 4);
        assert_eq!(catalog.get(71).unwrap().id.as_str(), "D6-P4-C3");
    }

    #[test]
    fn test_keyed_layout_is_ordered_by_id() {
        let json = r#"{
            "D1-P2-C1": {"dimension": "Stratégie", "palier": 2, "criterion_text": "B"},
            "D1-P1-C10": {"dimension": "Stratégie", "palier": 1, "criterion_text": "A10"},
            "D1-P1-C2": {"dimension": "Stratégie", "palier": 1, "criterion_text": "A2"}
        }"#;
        let catalog = CatalogLoader::from_json(json).unwrap();
        let ids: Vec<_> = catalog.criteria().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["D1-P1-C2", "D1-P1-C10", "D1-P2-C1"]);
        assert_eq!(catalog.get(2).unwrap().tier, Tier::new(2).unwrap());
    }

    #[test]
    fn test_mismatched_id_is_rejected() {
        let json = r#"[{"id": "D2-P1-C1", "dimension": "Stratégie", "tier": 1, "criterion_text": "x"}]"#;
        assert!(matches!(
            CatalogLoader::from_json(json),
            Err(CatalogLoadError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = CatalogLoader::load(Some(Path::new("/nonexistent/grid.json"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/grid.json"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.json");
        std::fs::write(
            &path,
            r#"[{"id": "D5-P1-C1", "dimension": "Technologie", "tier": 1, "criterion_text": "Postes"}]"#,
        )
        .unwrap();
        let catalog = CatalogLoader::load(Some(&path)).unwrap();
        assert_eq!(catalog.len(), 1);
    }
}
