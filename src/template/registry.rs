//! Template registry for loading and caching template documents

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use include_dir::{include_dir, Dir};
use serde_yaml::Value;
use thiserror::Error;

/// Built-in default templates, consulted after every custom search directory.
static BUILTIN_TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// File extension appended to a document name when resolving it on disk.
const TEMPLATE_EXTENSION: &str = "yaml";

/// Errors that can occur while loading or resolving templates.
///
/// The message literals are part of the public API: callers match on them,
/// so they must not change shape.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Document name found in no search directory and not built in
    #[error("Template `{name}` does not exist")]
    NotFound { name: String },

    /// Document file exists but could not be read
    #[error("Unable to read template `{path}`: {message}")]
    Read { path: String, message: String },

    /// Document file exists but is not valid YAML
    #[error("Unable to parse template `{path}`: {message}")]
    Parse { path: String, message: String },

    /// A path segment is not a key of the mapping it was applied to
    #[error("Template `{template}` has no element `{element}`")]
    MissingElement { template: String, element: String },

    /// A path segment matches no `name` field in the list it was applied to
    #[error("Template `{path}` has no named element `{name}`")]
    MissingNamedElement { path: String, name: String },

    /// A path segment was applied to a primitive value
    #[error("Template `{path}` does not refer to a mapping, rather it is type `{kind}`")]
    NotAMapping { path: String, kind: &'static str },

    /// An override segment matches no `name` field in the list it was applied to
    #[error("Template override `{path}` has no named mapping `{name}`")]
    OverrideMissingName { path: String, name: String },

    /// Same failure on the first override segment, before any path was consumed
    #[error("Template override has no named mapping `{name}`")]
    OverrideMissingNameAtRoot { name: String },

    /// An override segment was applied to a primitive value
    #[error("Template override `{path}` does not refer to a mapping")]
    OverrideNotAMapping { path: String },
}

/// Loads template documents by name and caches the parsed trees.
///
/// Custom search directories are consulted in the order given, before the
/// built-in default set. A document is read and parsed at most once per
/// registry instance; later requests are served from the cache even if the
/// file on disk has changed.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    search_paths: Vec<PathBuf>,
    cache: HashMap<String, Value>,
}

impl TemplateRegistry {
    /// Create a registry serving only the built-in templates
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with custom search directories, in priority order
    pub fn with_paths(search_paths: Vec<PathBuf>) -> Self {
        Self {
            search_paths,
            cache: HashMap::new(),
        }
    }

    /// Load the document named `name`, caching the parsed tree.
    ///
    /// Returns a deep clone; the cached document is never handed out by
    /// reference, so callers may freely mutate the result.
    pub fn document(&mut self, name: &str) -> Result<Value, TemplateError> {
        if let Some(document) = self.cache.get(name) {
            return Ok(document.clone());
        }

        let document = self.read_document(name)?;
        self.cache.insert(name.to_string(), document.clone());
        Ok(document)
    }

    /// Check whether a document is already cached
    pub fn is_cached(&self, name: &str) -> bool {
        self.cache.contains_key(name)
    }

    fn read_document(&self, name: &str) -> Result<Value, TemplateError> {
        let relative = format!("{}.{}", name, TEMPLATE_EXTENSION);

        for dir in &self.search_paths {
            let candidate = dir.join(&relative);
            if candidate.is_file() {
                let path = candidate.display().to_string();
                let content = fs::read_to_string(&candidate).map_err(|e| TemplateError::Read {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                return parse_document(&content, path);
            }
        }

        if let Some(file) = BUILTIN_TEMPLATES.get_file(&relative) {
            let content = file.contents_utf8().ok_or_else(|| TemplateError::Read {
                path: relative.clone(),
                message: "content is not valid UTF-8".to_string(),
            })?;
            return parse_document(content, relative);
        }

        Err(TemplateError::NotFound {
            name: name.to_string(),
        })
    }
}

fn parse_document(content: &str, path: String) -> Result<Value, TemplateError> {
    serde_yaml::from_str(content).map_err(|e| TemplateError::Parse {
        path,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_document() {
        let mut registry = TemplateRegistry::new();
        let document = registry.document("tags/init_config").expect("Should load");

        assert!(document.get("name").is_some());
        assert!(document.get("value").is_some());
        assert!(document.get("description").is_some());
    }

    #[test]
    fn test_unknown_document() {
        let mut registry = TemplateRegistry::new();
        let err = registry.document("unknown").unwrap_err();

        assert_eq!(err.to_string(), "Template `unknown` does not exist");
    }

    #[test]
    fn test_custom_path_precedence() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let template_dir = dir.path().join("tags");
        std::fs::create_dir_all(&template_dir).expect("Should create parent");
        std::fs::write(template_dir.join("init_config.yaml"), "test:\n- foo\n- bar")
            .expect("Should write template");

        let mut registry = TemplateRegistry::with_paths(vec![dir.path().to_path_buf()]);
        let document = registry.document("tags/init_config").expect("Should load");

        let expected: Value = serde_yaml::from_str("test:\n- foo\n- bar").unwrap();
        assert_eq!(document, expected);
    }

    #[test]
    fn test_cache_ignores_disk_changes() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let template_dir = dir.path().join("tags");
        std::fs::create_dir_all(&template_dir).expect("Should create parent");
        let template_file = template_dir.join("init_config.yaml");
        std::fs::write(&template_file, "test:\n- foo\n- bar").expect("Should write template");

        let mut registry = TemplateRegistry::with_paths(vec![dir.path().to_path_buf()]);
        registry.document("tags/init_config").expect("Should load");
        std::fs::write(&template_file, "> invalid").expect("Should overwrite template");

        let document = registry.document("tags/init_config").expect("Should still load");
        let expected: Value = serde_yaml::from_str("test:\n- foo\n- bar").unwrap();
        assert_eq!(document, expected);
        assert!(registry.is_cached("tags/init_config"));
    }

    #[test]
    fn test_parse_error_names_resolved_path() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let template_file = dir.path().join("invalid.yaml");
        std::fs::write(&template_file, "> invalid").expect("Should write template");

        let mut registry = TemplateRegistry::with_paths(vec![dir.path().to_path_buf()]);
        let err = registry.document("invalid").unwrap_err();

        let message = err.to_string();
        assert!(
            message.starts_with(&format!(
                "Unable to parse template `{}`",
                template_file.display()
            )),
            "unexpected message: {message}"
        );
    }
}
