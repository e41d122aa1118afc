//! Class-index and annotation-reader collaborators.
//!
//! The compiler never introspects bytecode itself; it queries these
//! read-only, synchronous collaborators. [`StaticClassIndex`] is the
//! JSON-backed implementation used by the CLI and the test suite.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use scrgen_common::error::{Result, ScrError};

use crate::parser::ast::AttrMap;

/// A class known to the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    /// Fully qualified class name.
    pub fqn: String,
}

/// Read-only index over the compiled classes of a build unit.
pub trait ClassIndex {
    /// Returns the classes carrying component metadata whose fully
    /// qualified name matches `pattern` (`*` matches any run of
    /// characters).
    fn find_annotated(&self, pattern: &str) -> Vec<ClassDescriptor>;

    /// Returns `true` when `name` is contained in or imported by the build
    /// unit.
    fn class_exists(&self, name: &str) -> bool;

    /// Returns the discovered method names of `class`. An empty set relaxes
    /// bind/unbind method checks.
    fn method_names(&self, class: &str) -> BTreeSet<String>;
}

/// Reads component metadata from an annotated class.
///
/// The returned attribute map uses the identical key vocabulary as the
/// header grammar (directive keys with trailing `:`).
pub trait AnnotationReader {
    /// Extracts the annotation-derived attribute map of `class`.
    ///
    /// # Errors
    ///
    /// Returns an error when the metadata cannot be extracted; the resolver
    /// records it as a resolution error and continues with other clauses.
    fn read_component_attributes(&self, class: &ClassDescriptor) -> Result<AttrMap>;
}

/// Matches `name` against a glob `pattern` where `*` matches any run of
/// characters (including none).
///
/// Two-pointer scan with single-star backtracking; linear in the name
/// length even when the pattern carries many `*`s.
#[must_use]
pub fn wildcard_match(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();
    let (mut p, mut n) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while n < name.len() {
        if pattern.get(p) == Some(&'*') {
            star = Some((p, n));
            p += 1;
        } else if pattern.get(p) == Some(&name[n]) {
            p += 1;
            n += 1;
        } else if let Some((star_p, star_n)) = star {
            // Widen the last star by one character and retry.
            p = star_p + 1;
            n = star_n + 1;
            star = Some((star_p, star_n + 1));
        } else {
            return false;
        }
    }

    while pattern.get(p) == Some(&'*') {
        p += 1;
    }
    p == pattern.len()
}

/// One class entry in the on-disk index document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexedClass {
    /// Fully qualified class name.
    pub fqn: String,
    /// Whether the class carries component metadata.
    #[serde(default)]
    pub annotated: bool,
    /// Annotation-derived attributes, header key vocabulary.
    #[serde(default)]
    pub attributes: AttrMap,
    /// Discovered method names.
    #[serde(default)]
    pub methods: BTreeSet<String>,
}

/// An immutable class index loaded from a JSON document.
///
/// Document shape:
///
/// ```json
/// {
///   "classes": [
///     {
///       "fqn": "com.acme.impl.FooImpl",
///       "annotated": true,
///       "attributes": [["provide:", "com.acme.Foo"]],
///       "methods": ["setLog", "unsetLog", "activate"]
///     }
///   ],
///   "imports": ["org.osgi.service.log.LogService"]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticClassIndex {
    /// Classes contained in the build unit.
    #[serde(default)]
    pub classes: Vec<IndexedClass>,
    /// Class names imported from outside the build unit.
    #[serde(default)]
    pub imports: Vec<String>,
}

impl StaticClassIndex {
    /// Parses an index document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ScrError::Serialization`] on malformed JSON.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Loads an index document from a file.
    ///
    /// # Errors
    ///
    /// Returns [`ScrError::Io`] when the file cannot be read and
    /// [`ScrError::Serialization`] on malformed JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ScrError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}

impl ClassIndex for StaticClassIndex {
    fn find_annotated(&self, pattern: &str) -> Vec<ClassDescriptor> {
        self.classes
            .iter()
            .filter(|c| c.annotated && wildcard_match(pattern, &c.fqn))
            .map(|c| ClassDescriptor { fqn: c.fqn.clone() })
            .collect()
    }

    fn class_exists(&self, name: &str) -> bool {
        self.classes.iter().any(|c| c.fqn == name) || self.imports.iter().any(|i| i == name)
    }

    fn method_names(&self, class: &str) -> BTreeSet<String> {
        self.classes
            .iter()
            .find(|c| c.fqn == class)
            .map(|c| c.methods.clone())
            .unwrap_or_default()
    }
}

impl AnnotationReader for StaticClassIndex {
    fn read_component_attributes(&self, class: &ClassDescriptor) -> Result<AttrMap> {
        Ok(self
            .classes
            .iter()
            .find(|c| c.fqn == class.fqn)
            .map(|c| c.attributes.clone())
            .unwrap_or_default())
    }
}
