//! Config Templates - dotted-path resolution of YAML configuration templates
//!
//! This library loads named YAML template documents from an ordered set of
//! search directories (custom directories first, then a built-in default set),
//! caches them per resolver instance, navigates dotted paths into them, and
//! applies path-keyed overrides to the resolved subtree.
//!
//! # Example
//!
//! ```rust
//! use config_templates::TemplateResolver;
//!
//! let mut resolver = TemplateResolver::new();
//! let template = resolver.load("tags/init_config").unwrap();
//! assert!(template.get("description").is_some());
//! ```

pub mod submission;
pub mod template;

pub use submission::{ColumnMap, MetricSpec, SubmissionError, SubmissionKind};
pub use template::{Overrides, TemplateError, TemplateRegistry, TemplateResolver};
