//! Grove Core - catalog model and configuration
//!
//! This crate defines the input side of Grove: the catalog of directory and
//! package descriptors, the closed metadata enums attached to each node, the
//! fatal catalog errors, and the analysis configuration.
//!
//! # Example
//!
//! ```
//! use grove_core::{Catalog, CatalogEntry, Category, Importance, RelationKind};
//!
//! let catalog = Catalog::new(vec![
//!     CatalogEntry::new("core", "packages/core", Category::Package, Importance::Critical),
//!     CatalogEntry::new("web", "apps/web", Category::Source, Importance::Important)
//!         .with_relationship("core", RelationKind::Imports),
//! ]);
//! assert_eq!(catalog.len(), 2);
//! ```

mod catalog;
mod config;
mod error;
mod node;

pub use catalog::{Catalog, CatalogEntry, Relationship};
pub use config::{AnalysisConfig, Direction, FilterSpec, CONFIG_DIR, CONFIG_FILE};
pub use error::{CatalogError, ConfigError, Result};
pub use node::{Category, Importance, Node, RelationKind};
