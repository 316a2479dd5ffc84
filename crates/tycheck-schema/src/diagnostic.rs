//! # Diagnostics
//!
//! The engine emits a flat, ordered stream of [`Diagnostic`]s, each tagged
//! with its depth below the validation root. [`build_tree`] folds that
//! stream into nested [`DiagnosticNode`]s: a diagnostic at depth `d + 1`
//! is a subproperty of the nearest preceding diagnostic at depth `d`.
//! [`flatten`] is the inverse.
//!
//! ```text
//! depth 0  items        Item[]   <array>
//! depth 1    [2]        Item     <object>
//! depth 2      price    Number   string
//! depth 0  name         String   undefined
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Where a diagnostic was found, relative to its parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyName {
    /// The validation root itself. Serialized as `null`.
    Root,
    /// A record field.
    Field(String),
    /// An array or tuple index.
    Index(usize),
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("(root)"),
            Self::Field(name) => f.write_str(name),
            Self::Index(index) => write!(f, "[{index}]"),
        }
    }
}

impl From<&str> for PropertyName {
    fn from(name: &str) -> Self {
        Self::Field(name.to_string())
    }
}

impl From<String> for PropertyName {
    fn from(name: String) -> Self {
        Self::Field(name)
    }
}

impl From<usize> for PropertyName {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// One depth-tagged mismatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub name: PropertyName,
    pub depth: usize,
    pub expected: String,
    pub found: String,
}

impl Diagnostic {
    pub fn new(
        name: impl Into<PropertyName>,
        depth: usize,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            depth,
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// A node of the reconstructed diagnostic tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticNode {
    pub name: PropertyName,
    pub expected: String,
    pub found: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subproperties: Option<Vec<DiagnosticNode>>,
}

impl DiagnosticNode {
    fn leaf(diagnostic: Diagnostic) -> Self {
        Self {
            name: diagnostic.name,
            expected: diagnostic.expected,
            found: diagnostic.found,
            subproperties: None,
        }
    }

    /// Children, empty for a leaf.
    pub fn children(&self) -> &[DiagnosticNode] {
        self.subproperties.as_deref().unwrap_or(&[])
    }
}

/// Fold a depth-tagged stream into a tree.
///
/// # Errors
///
/// [`SchemaError::MalformedDiagnostics`] if the stream starts below depth 0
/// or descends more than one level at a time.
pub fn build_tree<I>(diagnostics: I) -> Result<Vec<DiagnosticNode>, SchemaError>
where
    I: IntoIterator<Item = Diagnostic>,
{
    // frames[d] holds the siblings collected so far at depth d.
    let mut frames: Vec<Vec<DiagnosticNode>> = vec![Vec::new()];
    let mut previous = 0;
    for diagnostic in diagnostics {
        let depth = diagnostic.depth;
        if depth >= frames.len() {
            let parentless = depth > frames.len() || frames[depth - 1].is_empty();
            if parentless {
                return Err(SchemaError::MalformedDiagnostics { depth, previous });
            }
            frames.push(Vec::new());
        }
        while frames.len() > depth + 1 {
            close_frame(&mut frames);
        }
        frames[depth].push(DiagnosticNode::leaf(diagnostic));
        previous = depth;
    }
    while frames.len() > 1 {
        close_frame(&mut frames);
    }
    Ok(frames.pop().unwrap_or_default())
}

/// Attach the innermost frame to the last node of the frame above it.
fn close_frame(frames: &mut Vec<Vec<DiagnosticNode>>) {
    let Some(children) = frames.pop() else {
        return;
    };
    if children.is_empty() {
        return;
    }
    if let Some(parent) = frames.last_mut().and_then(|frame| frame.last_mut()) {
        parent.subproperties.get_or_insert_with(Vec::new).extend(children);
    }
}

/// Turn a tree back into a depth-tagged stream, parents before children.
pub fn flatten(nodes: &[DiagnosticNode]) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    flatten_into(nodes, 0, &mut out);
    out
}

fn flatten_into(nodes: &[DiagnosticNode], depth: usize, out: &mut Vec<Diagnostic>) {
    for node in nodes {
        out.push(Diagnostic::new(
            node.name.clone(),
            depth,
            node.expected.clone(),
            node.found.clone(),
        ));
        flatten_into(node.children(), depth + 1, out);
    }
}

/// The outcome of a validation call: `{"errors": null}` on success,
/// otherwise `{"errors": [..]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Option<Vec<DiagnosticNode>>,
}

impl ValidationReport {
    /// A report for the given stream; empty means valid.
    pub fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Result<Self, SchemaError> {
        if diagnostics.is_empty() {
            return Ok(Self::default());
        }
        Ok(Self {
            errors: Some(build_tree(diagnostics)?),
        })
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_none()
    }

    /// Top-level nodes, empty when valid.
    pub fn errors(&self) -> &[DiagnosticNode] {
        self.errors.as_deref().unwrap_or(&[])
    }

    /// The depth-tagged stream this report was built from.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        flatten(self.errors())
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return f.write_str("valid");
        }
        for (i, d) in self.diagnostics().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{:indent$}{}: expected {}, found {}",
                "",
                d.name,
                d.expected,
                d.found,
                indent = 2 * (d.depth + 1)
            )?;
        }
        Ok(())
    }
}
