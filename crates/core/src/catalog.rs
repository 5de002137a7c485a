//! SHIELDSYNC product plans.
//!
//! The purchase page lists a fixed set of yearly security plans and turns the
//! one the shopper picks into a [`NewCartItem`]. The built-in list lives in
//! [`Catalog::shieldsync`]; deployments can ship their own as YAML:
//!
//! ```yaml
//! products:
//!   - id: basic-av
//!     name: SHIELDSYNC Basic Antivirus
//!     price: 14
//!     features:
//!       - Real-time malware protection
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::NewCartItem;
use crate::types::{Price, ProductId};

/// Errors that can occur when building or querying a [`Catalog`].
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Two products share an ID.
    #[error("duplicate product id: {0}")]
    DuplicateProduct(ProductId),

    /// No product has the requested ID.
    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),

    /// The catalog file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog file is not valid YAML or has invalid entries.
    #[error("invalid catalog: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// A plan offered on the purchase page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Yearly price.
    pub price: Price,
    #[serde(default)]
    pub features: Vec<String>,
}

impl Product {
    /// The cart candidate the purchase page dispatches for this plan.
    #[must_use]
    pub fn to_cart_item(&self) -> NewCartItem {
        NewCartItem::new(self.id.clone(), self.name.clone(), self.price)
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    products: Vec<Product>,
}

/// An ordered list of products with unique IDs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, keeping the given order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateProduct`] if two products share an ID.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        for (index, product) in products.iter().enumerate() {
            if products.iter().take(index).any(|p| p.id == product.id) {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }
        }
        Ok(Self { products })
    }

    /// The plans sold on the SHIELDSYNC purchase page.
    #[must_use]
    pub fn shieldsync() -> Self {
        Self {
            products: vec![
                plan(
                    "basic-av",
                    "SHIELDSYNC Basic Antivirus",
                    14,
                    &[
                        "Real-time malware protection",
                        "Web protection",
                        "Email scanning",
                        "Automatic updates",
                    ],
                ),
                plan(
                    "pro-av",
                    "SHIELDSYNC Pro Security Suite",
                    9,
                    &[
                        "All Basic features",
                        "Firewall protection",
                        "Ransomware protection",
                        "Password manager",
                        "VPN service",
                    ],
                ),
                plan(
                    "enterprise-av",
                    "SHIELDSYNC Enterprise Defense",
                    10,
                    &[
                        "All Pro features",
                        "Advanced threat detection",
                        "Network monitoring",
                        "24/7 technical support",
                        "Remote device management",
                    ],
                ),
                plan(
                    "cloud-av",
                    "SHIELDSYNC Cloud Secure",
                    8,
                    &[
                        "Cloud infrastructure protection",
                        "API security",
                        "Container security",
                        "Compliance monitoring",
                        "Cloud access security broker",
                    ],
                ),
            ],
        }
    }

    /// Parse a catalog from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed, a price is negative, or two
    /// products share an ID.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(yaml)?;
        Self::new(file.products)
    }

    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid catalog.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_yaml_str(&yaml)?;
        tracing::debug!(path = %path.display(), products = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    /// Like [`Catalog::find`], for callers that report unknown IDs as errors.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownProduct`] if no product has the ID.
    pub fn get(&self, id: &ProductId) -> Result<&Product, CatalogError> {
        self.find(id)
            .ok_or_else(|| CatalogError::UnknownProduct(id.clone()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

fn plan(id: &str, name: &str, rupees: u32, features: &[&str]) -> Product {
    Product {
        id: ProductId::from(id),
        name: name.to_string(),
        price: Price::whole(rupees),
        features: features.iter().map(|f| (*f).to_string()).collect(),
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.iter()
    }
}
