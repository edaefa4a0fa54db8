//! Template resolution - dotted-path navigation and override application
//!
//! A template path like `tags/init_config.value.example` names a document
//! (`tags/init_config`) followed by branch segments addressing into it.
//! Mappings are addressed by key; lists are addressed by the `name` field of
//! their elements, never by position. Overrides are applied to the resolved
//! subtree after navigation, against a clone, so the cached document is never
//! mutated.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};

use super::registry::{TemplateError, TemplateRegistry};

/// Override specification: dotted sub-path relative to the resolved subtree,
/// mapped to the replacement value. Insertion order is preserved.
pub type Overrides = IndexMap<String, Value>;

/// Resolves dotted template paths against a registry of documents.
#[derive(Debug, Default)]
pub struct TemplateResolver {
    registry: TemplateRegistry,
}

impl TemplateResolver {
    /// Create a resolver serving only the built-in templates
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver with custom search directories, in priority order
    pub fn with_paths(search_paths: Vec<PathBuf>) -> Self {
        Self {
            registry: TemplateRegistry::with_paths(search_paths),
        }
    }

    /// Resolve a dotted template path.
    ///
    /// The first segment (which may contain `/`) names the document; any
    /// remaining segments address into it. The returned node may be a
    /// mapping, a list, or a primitive.
    pub fn load(&mut self, path: &str) -> Result<Value, TemplateError> {
        self.load_with_overrides(path, &Overrides::new())
    }

    /// Resolve a dotted template path, then apply overrides to the result.
    ///
    /// Each override path is resolved relative to the subtree selected by
    /// `path`. A failed override aborts the whole call.
    pub fn load_with_overrides(
        &mut self,
        path: &str,
        overrides: &Overrides,
    ) -> Result<Value, TemplateError> {
        let mut segments = path.split('.');
        let document_name = segments.next().unwrap_or(path);
        let branches: Vec<&str> = segments.collect();

        let document = self.registry.document(document_name)?;
        let mut node = navigate(document_name, document, &branches)?;

        for (override_path, value) in overrides {
            apply_override(&mut node, override_path, value.clone())?;
        }

        Ok(node)
    }
}

/// Walk branch segments into a document, consuming the (already cloned) tree.
fn navigate(
    document_name: &str,
    root: Value,
    branches: &[&str],
) -> Result<Value, TemplateError> {
    let mut node = root;

    for (consumed, segment) in branches.iter().enumerate() {
        node = match node {
            Value::Mapping(mut mapping) => match mapping.remove(*segment) {
                Some(child) => child,
                None => {
                    return Err(TemplateError::MissingElement {
                        template: document_name.to_string(),
                        element: branches.join("."),
                    })
                }
            },
            Value::Sequence(sequence) => {
                match sequence.into_iter().find(|item| element_name(item) == Some(*segment)) {
                    Some(item) => item,
                    None => {
                        return Err(TemplateError::MissingNamedElement {
                            path: path_so_far(document_name, &branches[..consumed]),
                            name: (*segment).to_string(),
                        })
                    }
                }
            }
            other => {
                return Err(TemplateError::NotAMapping {
                    path: path_so_far(document_name, &branches[..consumed]),
                    kind: type_label(&other),
                })
            }
        };
    }

    Ok(node)
}

/// Apply a single override to the resolved subtree.
///
/// Intermediate mapping keys are created on demand; list segments must match
/// an element's `name`. The terminal segment sets a mapping key or replaces
/// the matched list element in place.
fn apply_override(
    node: &mut Value,
    override_path: &str,
    value: Value,
) -> Result<(), TemplateError> {
    let segments: Vec<&str> = override_path.split('.').collect();
    let Some((last, parents)) = segments.split_last() else {
        return Ok(());
    };

    let mut consumed: Vec<&str> = Vec::new();
    let mut current = node;

    for segment in parents {
        current = match current {
            Value::Mapping(mapping) => mapping
                .entry(Value::String((*segment).to_string()))
                .or_insert_with(|| Value::Mapping(Mapping::new())),
            Value::Sequence(sequence) => {
                match sequence.iter_mut().find(|item| element_name(item) == Some(*segment)) {
                    Some(item) => item,
                    None => return Err(override_missing_name(&consumed, segment)),
                }
            }
            _ => {
                return Err(TemplateError::OverrideNotAMapping {
                    path: consumed.join("."),
                })
            }
        };
        consumed.push(*segment);
    }

    match current {
        Value::Mapping(mapping) => {
            mapping.insert(Value::String((*last).to_string()), value);
        }
        Value::Sequence(sequence) => {
            match sequence.iter_mut().find(|item| element_name(item) == Some(*last)) {
                Some(slot) => *slot = value,
                None => return Err(override_missing_name(&consumed, last)),
            }
        }
        _ => {
            return Err(TemplateError::OverrideNotAMapping {
                path: consumed.join("."),
            })
        }
    }

    Ok(())
}

fn override_missing_name(consumed: &[&str], segment: &str) -> TemplateError {
    if consumed.is_empty() {
        TemplateError::OverrideMissingNameAtRoot {
            name: segment.to_string(),
        }
    } else {
        TemplateError::OverrideMissingName {
            path: consumed.join("."),
            name: segment.to_string(),
        }
    }
}

/// The `name` field of a list element, when the element is a named mapping.
fn element_name(item: &Value) -> Option<&str> {
    item.as_mapping()
        .and_then(|mapping| mapping.get("name"))
        .and_then(Value::as_str)
}

fn path_so_far(document_name: &str, consumed: &[&str]) -> String {
    let mut path = document_name.to_string();
    for segment in consumed {
        path.push('.');
        path.push_str(segment);
    }
    path
}

/// Runtime kind label used in navigation error messages.
fn type_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged",
    }
}
