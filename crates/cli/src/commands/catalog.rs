//! Catalog listing command.
//!
//! # Usage
//!
//! ```bash
//! # List the built-in plans
//! shieldsync catalog
//!
//! # List plans from a custom catalog
//! shieldsync --catalog plans.yaml catalog
//! ```

use std::io::{self, Write};
use std::path::Path;

use shieldsync_core::{Catalog, CatalogError};
use tracing::info;

use crate::render;

/// Load the configured catalog, or the built-in plans when none is set.
///
/// # Errors
///
/// Returns an error if the catalog file cannot be read or parsed.
pub fn load(path: Option<&Path>) -> Result<Catalog, CatalogError> {
    match path {
        Some(path) => {
            let catalog = Catalog::from_yaml_file(path)?;
            info!(path = %path.display(), products = catalog.len(), "Using custom catalog");
            Ok(catalog)
        }
        None => Ok(Catalog::shieldsync()),
    }
}

/// Print every plan with its yearly price and features.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn list(catalog: &Catalog, out: &mut impl Write) -> io::Result<()> {
    if catalog.is_empty() {
        return writeln!(out, "No plans on sale");
    }
    writeln!(out, "Security Solutions")?;
    writeln!(out)?;
    render::catalog(out, catalog)?;
    out.flush()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_load_builtin() {
        let catalog = load(None).unwrap();
        assert_eq!(catalog, Catalog::shieldsync());
    }

    #[test]
    fn test_load_missing_file() {
        let result = load(Some(Path::new("/nonexistent/plans.yaml")));
        assert!(matches!(result, Err(CatalogError::Read { .. })));
    }

    #[test]
    fn test_list_empty_catalog() {
        let mut out = Vec::new();
        list(&Catalog::default(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No plans on sale\n");
    }

    #[test]
    fn test_list_builtin() {
        let mut out = Vec::new();
        list(&Catalog::shieldsync(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Security Solutions\n\n"));
        assert!(text.contains("cloud-av"));
    }
}
