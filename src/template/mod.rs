//! Template system for named configuration documents
//!
//! This module provides the infrastructure for loading, caching, and resolving
//! configuration templates. A template is addressed by a dotted path whose
//! first segment names a YAML document and whose remaining segments walk into
//! it, with optional path-keyed overrides applied to the resolved subtree.
//!
//! # Example
//!
//! ```text
//! tags/init_config                 // whole document
//! tags/init_config.value.example   // branch inside it
//! http/instances.skip_proxy        // list element addressed by `name`
//! ```

mod registry;
mod resolver;

pub use registry::{TemplateError, TemplateRegistry};
pub use resolver::{Overrides, TemplateResolver};
