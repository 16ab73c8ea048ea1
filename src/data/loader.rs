//! RON data loader
//!
//! Loads game data from external RON files, with fallback to hardcoded defaults.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::mutations::{default_mutation_defs, MutationCatalog, MutationDef};

/// Default location for the mutation catalog override
const MUTATIONS_PATH: &str = "assets/data/mutations.ron";

/// Errors raised while loading catalog data
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}")]
    Parse {
        path: String,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Parse a RON document into mutation definitions
pub fn parse_mutations(content: &str) -> Result<Vec<MutationDef>, ron::error::SpannedError> {
    ron::from_str(content)
}

/// Load mutation definitions from a specific RON file
pub fn load_mutations_from(path: &Path) -> Result<Vec<MutationDef>, CatalogError> {
    let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_mutations(&content).map_err(|source| CatalogError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Load the mutation catalog, falling back to the built-in defaults.
///
/// A missing file is normal; a broken file logs a warning and is ignored.
pub fn load_mutation_catalog() -> MutationCatalog {
    let path = Path::new(MUTATIONS_PATH);
    if path.exists() {
        match load_mutations_from(path) {
            Ok(defs) if !defs.is_empty() => {
                log::info!("Loaded {} mutations from {}", defs.len(), MUTATIONS_PATH);
                return MutationCatalog::new(defs);
            }
            Ok(_) => log::warn!("{} is empty; using defaults", MUTATIONS_PATH),
            Err(e) => log::warn!("{}; using defaults", e),
        }
    }
    MutationCatalog::new(default_mutation_defs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mutations_from_ron() {
        let content = r#"[
            (
                kind: ThickHide,
                name: "Thick Hide",
                description: "Leathery skin.",
                category: Defense,
                max_level: 3,
                weight: 10,
            ),
        ]"#;
        let defs = parse_mutations(content).unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].max_level, 3);
    }

    #[test]
    fn test_defaults_round_trip_through_ron() {
        let defs = default_mutation_defs();
        let serialized = ron::to_string(&defs).unwrap();
        let parsed = parse_mutations(&serialized).unwrap();
        assert_eq!(parsed.len(), defs.len());
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = load_mutations_from(Path::new("does/not/exist.ron")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
